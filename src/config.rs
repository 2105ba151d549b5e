// Configuration module for reading CoinDuel.toml
// Every tunable of the game and the search lives here rather than at call sites

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::moves::ScoringRules;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub board: BoardConfig,
    pub search: SearchConfig,
    pub scoring: ScoringRules,
    pub game: GameConfig,
    pub debug: DebugConfig,
}

/// Board generation and visibility constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BoardConfig {
    pub size: usize,
    pub coin_probability: f64,
    pub visibility_toggle_probability: f64,
}

/// Minimax search constants
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub depth: u32,
    /// Disable to run a plain minimax over the same tree
    pub alpha_beta: bool,
    /// Nodes beyond this count are scored as leaves; 0 means unlimited
    pub max_nodes: u64,
}

/// How an agent picks its moves
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Depth-limited minimax over both agents' moves
    #[default]
    Minimax,
    /// One-step look at the nearest visible coin
    Greedy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Minimax => f.write_str("minimax"),
            Strategy::Greedy => f.write_str("greedy"),
        }
    }
}

/// Live game loop constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    pub seed: u64,
    pub toggle_visibility: bool,
    pub max_rounds: u32,
    /// Strategy of agent 0 and agent 1
    #[serde(default)]
    pub strategies: [Strategy; 2],
}

/// Game log configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads and validates configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the CoinDuel.toml configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from CoinDuel.toml in the project root
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file("CoinDuel.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in CoinDuel.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardConfig {
                size: 8,
                coin_probability: 0.5,
                visibility_toggle_probability: 0.5,
            },
            search: SearchConfig {
                depth: 3,
                alpha_beta: true,
                max_nodes: 0,
            },
            scoring: ScoringRules {
                streak_bonus_threshold: 3,
            },
            game: GameConfig {
                seed: 0,
                toggle_visibility: true,
                max_rounds: 10_000,
                strategies: [Strategy::Minimax, Strategy::Minimax],
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "coin_duel_game.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            warn!("Could not load CoinDuel.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    /// Rejects values the game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Two agents need two distinct corners
        if self.board.size < 2 {
            return Err(ConfigError::Invalid(format!(
                "board.size must be at least 2, got {}",
                self.board.size
            )));
        }
        check_probability("board.coin_probability", self.board.coin_probability)?;
        check_probability(
            "board.visibility_toggle_probability",
            self.board.visibility_toggle_probability,
        )?;
        if self.search.depth == 0 {
            return Err(ConfigError::Invalid(
                "search.depth must be at least 1".to_string(),
            ));
        }
        if self.scoring.streak_bonus_threshold == 0 {
            return Err(ConfigError::Invalid(
                "scoring.streak_bonus_threshold must be at least 1".to_string(),
            ));
        }
        if self.debug.enabled && self.debug.log_file_path.is_empty() {
            return Err(ConfigError::Invalid(
                "debug.log_file_path must be set when logging is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardcoded_defaults_are_valid() {
        let config = Config::default_hardcoded();
        assert!(config.validate().is_ok());
        assert_eq!(config.board.size, 8);
        assert_eq!(config.search.depth, 3);
    }

    #[test]
    fn test_coin_duel_toml_can_be_parsed() {
        let result = Config::from_file("CoinDuel.toml");
        assert!(
            result.is_ok(),
            "Failed to parse CoinDuel.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("CoinDuel.toml")
            .expect("CoinDuel.toml should be parseable");
        assert_eq!(file_config, Config::default_hardcoded());
    }

    #[test]
    fn test_load_or_default_works() {
        let config = Config::load_or_default();
        assert_eq!(config.scoring.streak_bonus_threshold, 3);
    }

    #[test]
    fn test_strategies_parse_and_default_to_minimax() {
        let game: GameConfig = toml::from_str(
            "seed = 1\ntoggle_visibility = false\nmax_rounds = 5\nstrategies = [\"greedy\", \"minimax\"]",
        )
        .unwrap();
        assert_eq!(game.strategies, [Strategy::Greedy, Strategy::Minimax]);

        let game: GameConfig =
            toml::from_str("seed = 1\ntoggle_visibility = false\nmax_rounds = 5").unwrap();
        assert_eq!(game.strategies, [Strategy::Minimax; 2]);

        let bad: Result<GameConfig, _> = toml::from_str(
            "seed = 1\ntoggle_visibility = false\nmax_rounds = 5\nstrategies = [\"random\", \"greedy\"]",
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_missing_file_returns_read_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() {
        let result: Result<Config, _> = toml::from_str("[board]\nsize = \"eight\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        let mut config = Config::default_hardcoded();
        config.board.size = 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default_hardcoded();
        config.board.coin_probability = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default_hardcoded();
        config.board.visibility_toggle_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default_hardcoded();
        config.search.depth = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default_hardcoded();
        config.board.coin_probability = f64::NAN;
        assert!(config.validate().is_err());
    }
}
