use std::collections::{BTreeMap, HashMap};

use anyhow::{anyhow, Context};
use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::Deserialize;
use twenty_48::{Command, Direction};

/// Which keys steer the tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyScheme {
    #[default]
    Arrows,
    Wasd,
    Hjkl,
}

impl KeyScheme {
    fn direction_keys(self) -> [(KeyCode, Direction); 4] {
        match self {
            KeyScheme::Arrows => [
                (KeyCode::Up, Direction::Up),
                (KeyCode::Left, Direction::Left),
                (KeyCode::Down, Direction::Down),
                (KeyCode::Right, Direction::Right),
            ],
            KeyScheme::Wasd => [
                (KeyCode::Char('w'), Direction::Up),
                (KeyCode::Char('a'), Direction::Left),
                (KeyCode::Char('s'), Direction::Down),
                (KeyCode::Char('d'), Direction::Right),
            ],
            KeyScheme::Hjkl => [
                (KeyCode::Char('k'), Direction::Up),
                (KeyCode::Char('h'), Direction::Left),
                (KeyCode::Char('j'), Direction::Down),
                (KeyCode::Char('l'), Direction::Right),
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct KeyCombo(KeyCode, KeyModifiers);

impl KeyCombo {
    fn plain(code: KeyCode) -> Self {
        KeyCombo(code, KeyModifiers::NONE)
    }

    /// Letters are matched case-insensitively, so shift is dropped for them.
    fn normalized(code: KeyCode, modifiers: KeyModifiers) -> Self {
        match code {
            KeyCode::Char(c) => KeyCombo(
                KeyCode::Char(c.to_ascii_lowercase()),
                modifiers.difference(KeyModifiers::SHIFT),
            ),
            code => KeyCombo(code, modifiers),
        }
    }

    fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("ctrl-") {
            let KeyCombo(code, _) = Self::parse(rest)?;
            return Some(KeyCombo(code, KeyModifiers::CONTROL));
        }
        let code = match lower.as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "esc" => KeyCode::Esc,
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "space" => KeyCode::Char(' '),
            single if single.chars().count() == 1 => KeyCode::Char(single.chars().next()?),
            _ => return None,
        };
        Some(Self::plain(code))
    }

    fn name(&self) -> String {
        let key = match self.0 {
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::Backspace => "backspace".to_string(),
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            other => format!("{other:?}"),
        };
        if self.1.contains(KeyModifiers::CONTROL) {
            format!("ctrl-{key}")
        } else {
            key
        }
    }
}

#[derive(Clone, Debug)]
pub struct KeyMap {
    bindings: HashMap<KeyCombo, Command>,
}

impl KeyMap {
    /// Direction keys for `scheme` plus the control keys. Undo and redo are
    /// only bound when the session keeps history.
    pub fn new(scheme: KeyScheme, with_history: bool) -> Self {
        let mut bindings: HashMap<KeyCombo, Command> = scheme
            .direction_keys()
            .into_iter()
            .map(|(code, d)| (KeyCombo::plain(code), Command::Move(d)))
            .collect();
        bindings.extend([
            (KeyCombo::plain(KeyCode::Char('q')), Command::Quit),
            (KeyCombo::plain(KeyCode::Esc), Command::Quit),
            (
                KeyCombo(KeyCode::Char('c'), KeyModifiers::CONTROL),
                Command::Quit,
            ),
            (KeyCombo::plain(KeyCode::Char('n')), Command::Restart),
        ]);
        if with_history {
            bindings.extend([
                (KeyCombo::plain(KeyCode::Char('u')), Command::Undo),
                (KeyCombo::plain(KeyCode::Char('r')), Command::Redo),
            ]);
        }
        KeyMap { bindings }
    }

    /// Adds or replaces bindings from the config file, `key name -> command`.
    pub fn with_bindings(mut self, extra: &BTreeMap<String, String>) -> anyhow::Result<Self> {
        for (key, command) in extra {
            let combo = KeyCombo::parse(key).ok_or_else(|| anyhow!("unknown key `{key}`"))?;
            let command: Command = command
                .parse()
                .with_context(|| format!("binding for key `{key}`"))?;
            self.bindings.insert(combo, command);
        }
        Ok(self)
    }

    pub fn command_for(&self, event: &KeyEvent) -> Option<Command> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        self.bindings
            .get(&KeyCombo::normalized(event.code, event.modifiers))
            .copied()
    }

    fn keys_for(&self, command: Command) -> Option<String> {
        let mut names: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, c)| **c == command)
            .map(|(k, _)| k.name())
            .collect();
        if names.is_empty() {
            return None;
        }
        names.sort();
        Some(names.join("/"))
    }

    /// One line listing what is bound, e.g. `w a s d move  u undo  q quit`.
    pub fn help_line(&self) -> String {
        let mut parts = Vec::new();
        let moves: Vec<String> = [
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Right,
        ]
        .into_iter()
        .filter_map(|d| self.keys_for(Command::Move(d)))
        .collect();
        if !moves.is_empty() {
            parts.push(format!("{} move", moves.join(" ")));
        }
        for (command, label) in [
            (Command::Undo, "undo"),
            (Command::Redo, "redo"),
            (Command::Restart, "restart"),
            (Command::Quit, "quit"),
        ] {
            if let Some(keys) = self.keys_for(command) {
                parts.push(format!("{keys} {label}"));
            }
        }
        parts.join("  ")
    }
}
