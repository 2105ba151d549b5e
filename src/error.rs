// Error types for the game engine, configuration loading and log replay

use thiserror::Error;

use crate::types::{Coord, Direction};

/// Errors raised by the board and move applier
///
/// These indicate a caller bug (a move that was never in the valid move set,
/// or a malformed board) and are not expected during normal play.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move: agent {agent} cannot move {direction} from {from}")]
    IllegalMove {
        agent: usize,
        from: Coord,
        direction: Direction,
    },

    #[error("agent index {0} out of range")]
    UnknownAgent(usize),

    #[error("board of size {size} needs {expected} cells, got {actual}")]
    BoardShape {
        size: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid board cell {0:?}")]
    BoardCell(char),

    #[error("agent {agent} at {at} is off the board")]
    AgentOffBoard { agent: usize, at: Coord },

    #[error("both agents occupy {0}")]
    AgentsOverlap(Coord),
}

/// Errors raised while starting a game
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid starting position: {0}")]
    Placement(#[from] GameError),
}

/// Errors raised while loading or validating `CoinDuel.toml`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while loading a JSONL game log
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read log file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse JSON on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("round {round}: recorded state is invalid: {source}")]
    InvalidState {
        round: u32,
        #[source]
        source: GameError,
    },

    #[error("round {round}: recorded move {direction} is illegal in the recorded state")]
    IllegalRecordedMove { round: u32, direction: Direction },

    #[error("round {0} not found in log file")]
    RoundNotFound(u32),

    #[error("round {round}: expected one of {expected:?}, but got {actual:?}")]
    UnexpectedMove {
        round: u32,
        expected: Vec<Direction>,
        actual: Option<Direction>,
    },
}
