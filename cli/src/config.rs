use std::{collections::BTreeMap, fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use twenty_48::Rules;

use crate::keymap::KeyScheme;

/// Settings read from the optional TOML file. Every key may be left out.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheme: KeyScheme,
    #[serde(flatten)]
    pub rules: Rules,
    /// How long the computer "thinks" before its move in versus mode.
    pub computer_delay_ms: u64,
    /// Extra key bindings, key name to command name.
    pub bindings: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheme: KeyScheme::default(),
            rules: Rules::default(),
            computer_delay_ms: 200,
            bindings: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn from_toml(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_toml)
    }

    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;
    use twenty_48::{Rules, UndoPolicy};

    use super::Config;
    use crate::keymap::KeyScheme;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn full_file_is_read() {
        let config = Config::parse(
            r#"
            scheme = "hjkl"
            four_probability = 0.25
            win_tile = 4096
            undo = { limited = 1 }
            computer_delay_ms = 50

            [bindings]
            x = "restart"
            space = "undo"
            "#,
        )
        .unwrap();
        assert_eq!(config.scheme, KeyScheme::Hjkl);
        assert_eq!(
            config.rules,
            Rules {
                four_probability: 0.25,
                win_tile: 4096,
                undo: UndoPolicy::Limited(1),
            }
        );
        assert_eq!(config.computer_delay_ms, 50);
        assert_eq!(config.bindings["x"], "restart");
        assert_eq!(config.bindings.len(), 2);
    }

    #[test]
    fn undo_can_be_switched_off() {
        let config = Config::parse(r#"undo = "disabled""#).unwrap();
        assert_eq!(config.rules.undo, UndoPolicy::Disabled);
        assert_eq!(config.scheme, KeyScheme::Arrows);
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(Config::parse(r#"scheme = "joystick""#).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Config::from_toml(std::path::Path::new("/nonexistent/twenty48.toml"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/twenty48.toml"));
    }
}
