// src/config.rs
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// env_logger filter used when `CHESS_MATCH_LOG` is unset.
    pub log_level: String,
    /// JSON snapshot of stored games; no persistence across runs when absent.
    pub store_path: Option<PathBuf>,
    pub default_game_name: String,
    pub white_player: String,
    pub black_player: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".into(),
            store_path: None,
            default_game_name: "hot-seat".into(),
            white_player: "white".into(),
            black_player: "black".into(),
        }
    }
}

impl Config {
    /// Reads a YAML config. No path, or a path that does not exist, yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(p) = path else { return Ok(Self::default()) };
        if !p.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(p).map_err(|e| ConfigError::Io(p.display().to_string(), e))?;
        Self::from_yaml(&content).map_err(|e| ConfigError::Parse(p.display().to_string(), e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = Config::from_yaml("white_player: alice\nstore_path: /tmp/games.json\n").unwrap();
        assert_eq!(cfg.white_player, "alice");
        assert_eq!(cfg.black_player, "black");
        assert_eq!(cfg.store_path, Some(PathBuf::from("/tmp/games.json")));
        assert_eq!(cfg.log_level, "warn");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = Config::load(Some(Path::new("/nonexistent/chess_match.yaml"))).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(Config::from_yaml("white_player: [unclosed").is_err());
    }
}
