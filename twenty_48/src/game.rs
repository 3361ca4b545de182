use std::str::FromStr;

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;

use crate::{
    Board, Direction, Error, History, Result, Snapshot, Tile, TileSpawner, UndoPolicy,
    FOUR_PROBABILITY, WINNING_TILE,
};

#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub four_probability: f64,
    pub win_tile: u32,
    pub undo: UndoPolicy,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            four_probability: FOUR_PROBABILITY,
            win_tile: WINNING_TILE,
            undo: UndoPolicy::Unlimited,
        }
    }
}

impl Rules {
    pub(crate) fn spawner(&self) -> Result<TileSpawner> {
        Tile::from_value(self.win_tile)?;
        TileSpawner::new(self.four_probability)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Undo,
    Redo,
    Restart,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "up" => Command::Move(Direction::Up),
            "down" => Command::Move(Direction::Down),
            "left" => Command::Move(Direction::Left),
            "right" => Command::Move(Direction::Right),
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "restart" => Command::Restart,
            "quit" => Command::Quit,
            other => return Err(Error::UnknownCommand(other.to_string())),
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Playing,
    /// The winning tile is on the board. Play may continue.
    Won,
    /// No move is left. Takes precedence over `Won`.
    Over,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Moved { gained: u32 },
    Unchanged,
    Undone,
    Redone,
    Restarted,
    Ignored,
    Quit,
}

/// One player's session: the board plus score keeping and undo history.
#[derive(Clone, Debug)]
pub struct Game<R = StdRng> {
    board: Board,
    score: u32,
    best: u32,
    history: History,
    rules: Rules,
    spawner: TileSpawner,
    rng: R,
}

impl Game<StdRng> {
    pub fn new_from_seed(rules: Rules, seed: u64) -> Result<Self> {
        Self::new(rules, StdRng::seed_from_u64(seed))
    }

    pub fn new_from_entropy(rules: Rules) -> Result<Self> {
        Self::new(rules, StdRng::from_os_rng())
    }
}

impl<R: Rng> Game<R> {
    pub fn new(rules: Rules, mut rng: R) -> Result<Self> {
        let spawner = rules.spawner()?;
        let board = Board::initialize(&mut rng, &spawner);
        Ok(Self::assemble(board, rules, spawner, rng))
    }

    /// Starts from a given position instead of a random one.
    pub fn from_board(board: Board, rules: Rules, rng: R) -> Result<Self> {
        let spawner = rules.spawner()?;
        Ok(Self::assemble(board, rules, spawner, rng))
    }

    fn assemble(board: Board, rules: Rules, spawner: TileSpawner, rng: R) -> Self {
        Self {
            board,
            score: 0,
            best: 0,
            history: History::new(rules.undo),
            rules,
            spawner,
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn status(&self) -> Status {
        self.board.status(self.rules.win_tile)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            score: self.score,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.board = snapshot.board;
        self.score = snapshot.score;
    }

    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Quit => Outcome::Quit,
            Command::Restart => {
                self.restart();
                Outcome::Restarted
            }
            Command::Undo => self.undo(),
            // a finished game only takes the commands above
            _ if self.status() == Status::Over => Outcome::Ignored,
            Command::Redo => self.redo(),
            Command::Move(direction) => self.play(direction),
        }
    }

    fn play(&mut self, direction: Direction) -> Outcome {
        let outcome = self.board.slide(direction);
        if !outcome.moved {
            return Outcome::Unchanged;
        }
        self.history.record(self.snapshot());
        self.board = outcome.board;
        self.score += outcome.gained;
        self.best = self.best.max(self.score);
        self.board.spawn_random_tile(&mut self.rng, &self.spawner);
        debug!(
            "moved {direction}, gained {} (score {})",
            outcome.gained, self.score
        );
        if self.status() == Status::Over {
            info!("game over with score {}", self.score);
        }
        Outcome::Moved {
            gained: outcome.gained,
        }
    }

    fn undo(&mut self) -> Outcome {
        match self.history.undo(self.snapshot()) {
            Some(prev) => {
                debug!("undo back to score {}", prev.score);
                self.restore(prev);
                Outcome::Undone
            }
            None => Outcome::Ignored,
        }
    }

    fn redo(&mut self) -> Outcome {
        match self.history.redo(self.snapshot()) {
            Some(next) => {
                debug!("redo forward to score {}", next.score);
                self.restore(next);
                self.best = self.best.max(self.score);
                Outcome::Redone
            }
            None => Outcome::Ignored,
        }
    }

    /// New board and zero score. The best score outlives restarts.
    pub fn restart(&mut self) {
        info!("restarting, last score {} best {}", self.score, self.best);
        self.board = Board::initialize(&mut self.rng, &self.spawner);
        self.score = 0;
        self.history.clear();
    }
}
