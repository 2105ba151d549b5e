// Game log for recording each live turn as a JSONL line
//
// Each entry holds the state the search saw (after the visibility toggle, before
// the move) so the replay tool can re-run the search on it. Write failures are
// logged and never interrupt the game.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::agent::Agents;
use crate::board::Board;
use crate::config::Strategy;
use crate::types::Direction;

/// Represents a single game log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub round: u32,
    pub agent: usize,
    /// `None` when the agent had no legal move and passed
    pub chosen_move: Option<Direction>,
    pub board: Board,
    pub agents: Agents,
    /// Game seed; the turn's tie-breaking seed is derived from it and `round`
    #[serde(default)]
    pub seed: u64,
    /// How the agent to move chose its move
    #[serde(default)]
    pub strategy: Strategy,
    pub timestamp: String,
}

impl LogEntry {
    pub fn new(
        round: u32,
        agent: usize,
        chosen_move: Option<Direction>,
        board: Board,
        agents: Agents,
    ) -> Self {
        LogEntry {
            round,
            agent,
            chosen_move,
            board,
            agents,
            seed: 0,
            strategy: Strategy::Minimax,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// JSONL writer; a disabled logger is a no-op
pub struct GameLog {
    file: Option<BufWriter<File>>,
}

impl GameLog {
    /// Creates a new game log
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub fn new<P: AsRef<Path>>(enabled: bool, log_file_path: P) -> Self {
        if !enabled {
            return Self::disabled();
        }

        let path = log_file_path.as_ref();
        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
        {
            Ok(file) => {
                info!("Game logging enabled: {}", path.display());
                GameLog {
                    file: Some(BufWriter::new(file)),
                }
            }
            Err(e) => {
                error!("Failed to create game log file '{}': {}", path.display(), e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled game log (no-op)
    pub fn disabled() -> Self {
        GameLog { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Appends one entry and flushes it to disk
    pub fn record(&mut self, entry: &LogEntry) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        match serde_json::to_string(entry) {
            Ok(json_line) => {
                if let Err(e) = writeln!(file, "{}", json_line) {
                    error!("Failed to write game log entry: {}", e);
                } else if let Err(e) = file.flush() {
                    error!("Failed to flush game log: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize game log entry: {}", e);
            }
        }
    }
}
