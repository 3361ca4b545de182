use std::{
    io::{stdout, Stdout},
    time::Duration,
};

use anyhow::Context;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, warn};
use rand::Rng;
use twenty_48::{Command, Game, MoveStrategy, Outcome, Status, Turn, Versus};

use crate::{
    keymap::KeyMap,
    render::{draw, Screen},
};

const TITLE: &str = "2048";
const VERSUS_TITLE: &str = "2048 - you against the computer";

/// Raw mode and the alternate screen, undone on drop so an error never
/// leaves the terminal in a broken state.
struct RawTerminal {
    out: Stdout,
}

impl RawTerminal {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("switching the terminal to raw mode")?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, Hide).context("entering the alternate screen")?;
        Ok(Self { out })
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, Show, LeaveAlternateScreen) {
            warn!("could not leave the alternate screen: {e}");
        }
        if let Err(e) = disable_raw_mode() {
            warn!("could not restore the terminal: {e}");
        }
    }
}

fn solo_banner<R: Rng>(game: &Game<R>) -> Option<String> {
    match game.status() {
        Status::Playing => None,
        Status::Won => Some(format!("You reached {}!", game.rules().win_tile)),
        Status::Over => Some("Game Over!".to_string()),
    }
}

pub fn play_solo<R: Rng>(mut game: Game<R>, keymap: &KeyMap) -> anyhow::Result<()> {
    let help = keymap.help_line();
    let mut term = RawTerminal::enter()?;

    loop {
        let screen = Screen {
            title: TITLE,
            scores: format!("Score: {}   Best: {}", game.score(), game.best()),
            board: game.board(),
            banner: solo_banner(&game),
            help: &help,
        };
        draw(&mut term.out, &screen)?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        let Some(command) = keymap.command_for(&key) else {
            debug!("ignoring {key:?}");
            continue;
        };
        if game.apply(command) == Outcome::Quit {
            break;
        }
    }

    drop(term);
    println!("Final score: {} (best {})", game.score(), game.best());
    println!("Bye!");
    Ok(())
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies a key command in versus mode. Undo and redo have no meaning here.
pub fn versus_command<S: MoveStrategy, R: Rng>(
    versus: &mut Versus<S, R>,
    command: Command,
) -> Flow {
    match command {
        Command::Quit => return Flow::Quit,
        Command::Restart => versus.restart(),
        Command::Move(direction) => {
            versus.player_move(direction);
        }
        Command::Undo | Command::Redo => {}
    }
    Flow::Continue
}

fn versus_banner<S: MoveStrategy, R: Rng>(versus: &Versus<S, R>) -> Option<String> {
    match versus.status() {
        Status::Over => Some("Game Over!".to_string()),
        Status::Won => Some("2048 is on the board!".to_string()),
        Status::Playing => None,
    }
}

pub fn play_versus<S: MoveStrategy, R: Rng>(
    mut versus: Versus<S, R>,
    keymap: &KeyMap,
    computer_delay: Duration,
) -> anyhow::Result<()> {
    let help = keymap.help_line();
    let mut term = RawTerminal::enter()?;

    loop {
        let screen = Screen {
            title: VERSUS_TITLE,
            scores: format!(
                "Player: {}   Computer: {}",
                versus.player_score(),
                versus.computer_score()
            ),
            board: versus.board(),
            banner: versus_banner(&versus),
            help: &help,
        };
        draw(&mut term.out, &screen)?;

        // the computer moves once the delay passes without a key press
        if versus.turn() == Turn::Computer && !event::poll(computer_delay)? {
            if let Some(direction) = versus.computer_move() {
                debug!("computer chose {direction}");
            }
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        let Some(command) = keymap.command_for(&key) else {
            continue;
        };
        if versus_command(&mut versus, command) == Flow::Quit {
            break;
        }
    }

    drop(term);
    println!(
        "Final score - Player: {} | Computer: {}",
        versus.player_score(),
        versus.computer_score()
    );
    println!("Bye!");
    Ok(())
}
