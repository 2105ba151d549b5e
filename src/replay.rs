// Replay module for analyzing recorded games and debugging move selection
//
// This module provides functionality to:
// 1. Parse JSONL game logs
// 2. Re-run the search on each recorded state
// 3. Compare recorded vs replayed moves
// 4. Generate summary reports
//
// Each entry carries the game seed and the agent's strategy, so minimax ties are
// re-drawn from the same RNG and a replayed move matches the recorded one.
// `consistent` reports whether the recorded move is among the moves tied for
// the best score.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::agent::{check_placement, valid_moves};
use crate::config::{Config, Strategy};
use crate::error::ReplayError;
use crate::game_log::LogEntry;
use crate::greedy;
use crate::search::{turn_seed, Searcher};
use crate::types::Direction;

/// Result of replaying a single round
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayResult {
    pub round: u32,
    pub agent: usize,
    pub original_move: Option<Direction>,
    pub replayed_move: Option<Direction>,
    pub matches: bool,
    pub consistent: bool,
    pub replayed_score: f64,
    pub tied_moves: Vec<Direction>,
    pub nodes: u64,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplayStats {
    pub total_rounds: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub consistent: usize,
    pub match_rate: f64,
    pub consistency_rate: f64,
}

/// Replay engine for analyzing game logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

fn move_name(dir: Option<Direction>) -> &'static str {
    dir.map(|d| d.as_str()).unwrap_or("pass")
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, ReplayError> {
        let file = File::open(log_path.as_ref())?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line).map_err(|source| ReplayError::Parse {
                line: line_num + 1,
                source,
            })?;
            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the search on a recorded state and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, ReplayError> {
        if self.verbose {
            info!("Replaying round {}...", entry.round);
        }

        check_placement(&entry.board, &entry.agents).map_err(|source| {
            ReplayError::InvalidState {
                round: entry.round,
                source,
            }
        })?;

        let legal = valid_moves(&entry.agents, entry.agent, &entry.board);
        if let Some(direction) = entry.chosen_move {
            if !legal.contains(&direction) {
                return Err(ReplayError::IllegalRecordedMove {
                    round: entry.round,
                    direction,
                });
            }
        }

        let start_time = Instant::now();
        let (search, nodes) = match entry.strategy {
            Strategy::Minimax => {
                let rng = StdRng::seed_from_u64(turn_seed(entry.seed, entry.round));
                let mut searcher = Searcher::new(self.config.search, self.config.scoring, rng);
                let search = searcher.best_move(&entry.board, &entry.agents, entry.agent);
                (search, searcher.stats().nodes)
            }
            Strategy::Greedy => (
                greedy::choose_move(&entry.board, &entry.agents, entry.agent),
                0,
            ),
        };
        let computation_time_us = start_time.elapsed().as_micros();

        let matches = search.best_move == entry.chosen_move;
        let consistent = match entry.chosen_move {
            Some(direction) => search.tied_moves.contains(&direction),
            None => search.best_move.is_none(),
        };

        let result = ReplayResult {
            round: entry.round,
            agent: entry.agent,
            original_move: entry.chosen_move,
            replayed_move: search.best_move,
            matches,
            consistent,
            replayed_score: search.score,
            tied_moves: search.tied_moves,
            nodes,
            computation_time_us,
        };

        if self.verbose {
            if matches {
                info!(
                    "Round {}: ✓ MATCH - {} (score: {:.3}, nodes: {}, time: {}us)",
                    result.round,
                    move_name(result.replayed_move),
                    result.replayed_score,
                    result.nodes,
                    result.computation_time_us
                );
            } else {
                warn!(
                    "Round {}: ✗ MISMATCH - Original: {}, Replayed: {} (tied: {}, score: {:.3})",
                    result.round,
                    move_name(result.original_move),
                    move_name(result.replayed_move),
                    result.consistent,
                    result.replayed_score
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries, skipping ones that fail
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => warn!("Failed to replay round {}: {}", entry.round, e),
            }
        }

        results
    }

    /// Replays specific rounds from a log
    pub fn replay_rounds(
        &self,
        entries: &[LogEntry],
        rounds: &[u32],
    ) -> Result<Vec<ReplayResult>, ReplayError> {
        let mut results = Vec::new();

        for &round in rounds {
            let entry = entries
                .iter()
                .find(|e| e.round == round)
                .ok_or(ReplayError::RoundNotFound(round))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => warn!("Failed to replay round {}: {}", round, e),
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_rounds = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let consistent = results.iter().filter(|r| r.consistent).count();
        let percent = |n: usize| {
            if total_rounds > 0 {
                (n as f64 / total_rounds as f64) * 100.0
            } else {
                0.0
            }
        };

        ReplayStats {
            total_rounds,
            matches,
            mismatches: total_rounds - matches,
            consistent,
            match_rate: percent(matches),
            consistency_rate: percent(consistent),
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Rounds:   {}", stats.total_rounds);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!(
            "Among best:     {} ({:.1}%)",
            stats.consistent, stats.consistency_rate
        );
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_nodes =
                results.iter().map(|r| r.nodes as f64).sum::<f64>() / results.len() as f64;
            let avg_time = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;

            println!("Average Nodes:              {:.1}", avg_nodes);
            println!("Average Computation Time:   {:.1}us\n", avg_time);
        }

        let inconsistent: Vec<_> = results.iter().filter(|r| !r.consistent).collect();
        if !inconsistent.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("              MOVES OUTSIDE THE BEST SET");
            println!("═══════════════════════════════════════════════════════════");

            for result in inconsistent {
                println!(
                    "Round {}: {} → {} (best: {:?}, score: {:.3})",
                    result.round,
                    move_name(result.original_move),
                    move_name(result.replayed_move),
                    result.tied_moves.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    result.replayed_score
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(u32, Vec<Direction>)],
    ) -> Result<(), ReplayError> {
        for (round, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.round == *round)
                .ok_or(ReplayError::RoundNotFound(*round))?;

            let accepted = entry
                .chosen_move
                .map(|dir| acceptable.contains(&dir))
                .unwrap_or(false);
            if !accepted {
                return Err(ReplayError::UnexpectedMove {
                    round: *round,
                    expected: acceptable.clone(),
                    actual: entry.chosen_move,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{starting_agents, Agent};
    use crate::board::Board;
    use crate::error::GameError;
    use crate::types::Coord;

    fn entry(round: u32, chosen_move: Option<Direction>) -> LogEntry {
        let board = Board::from_rows(&[". o .", ". . .", ". . ."]).unwrap();
        LogEntry::new(round, 0, chosen_move, board, starting_agents(3))
    }

    #[test]
    fn test_replay_entry_matches_forced_capture() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let result = engine.replay_entry(&entry(1, Some(Direction::Right))).unwrap();

        assert!(result.matches);
        assert!(result.consistent);
        assert_eq!(result.tied_moves, vec![Direction::Right]);
    }

    #[test]
    fn test_replay_entry_flags_suboptimal_move() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let result = engine.replay_entry(&entry(1, Some(Direction::Down))).unwrap();

        assert!(!result.matches);
        assert!(!result.consistent);
        assert_eq!(result.replayed_move, Some(Direction::Right));
    }

    #[test]
    fn test_replay_entry_rejects_illegal_recorded_move() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let result = engine.replay_entry(&entry(4, Some(Direction::Up)));
        assert!(matches!(
            result,
            Err(ReplayError::IllegalRecordedMove { round: 4, .. })
        ));
    }

    #[test]
    fn test_replay_entry_rejects_invalid_placement() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let board = Board::from_rows(&["o . .", ". . .", ". . ."]).unwrap();

        let off_board = [Agent::new(Coord::new(0, 0)), Agent::new(Coord::new(3, 3))];
        let result = engine.replay_entry(&LogEntry::new(2, 0, None, board.clone(), off_board));
        assert!(matches!(
            result,
            Err(ReplayError::InvalidState {
                round: 2,
                source: GameError::AgentOffBoard { agent: 1, .. },
            })
        ));

        let stacked = [Agent::new(Coord::new(1, 1)), Agent::new(Coord::new(1, 1))];
        let result = engine.replay_entry(&LogEntry::new(5, 1, None, board, stacked));
        assert!(matches!(
            result,
            Err(ReplayError::InvalidState {
                round: 5,
                source: GameError::AgentsOverlap(_),
            })
        ));
    }

    #[test]
    fn test_recorded_pass_with_moves_available_is_inconsistent() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let result = engine.replay_entry(&entry(2, None)).unwrap();

        assert!(!result.matches);
        assert!(!result.consistent);
    }

    #[test]
    fn test_seeded_entry_replays_exact_tie_break() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        // Only a hidden coin: all four moves tie
        let board = Board::from_rows(&["x . .", ". . .", ". . ."]).unwrap();
        let agents = [Agent::new(Coord::new(1, 1)), Agent::new(Coord::new(2, 2))];

        for seed in 0..8 {
            let round = 7;
            let config = Config::default_hardcoded();
            let rng = StdRng::seed_from_u64(turn_seed(seed, round));
            let recorded = Searcher::new(config.search, config.scoring, rng)
                .best_move(&board, &agents, 0)
                .best_move;

            let entry = LogEntry::new(round, 0, recorded, board.clone(), agents).with_seed(seed);
            let result = engine.replay_entry(&entry).unwrap();
            assert!(result.matches, "seed {}", seed);
            assert_eq!(result.tied_moves.len(), 4);
        }
    }

    #[test]
    fn test_greedy_entry_is_replayed_greedily() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let board = Board::from_rows(&[". . .", ". . .", "o . ."]).unwrap();
        let agents = [Agent::new(Coord::new(0, 0)), Agent::new(Coord::new(2, 2))];
        let entry = LogEntry::new(1, 0, Some(Direction::Down), board, agents)
            .with_strategy(Strategy::Greedy);

        let result = engine.replay_entry(&entry).unwrap();
        assert!(result.matches);
        assert_eq!(result.nodes, 0);
    }

    #[test]
    fn test_generate_stats_rates() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![entry(1, Some(Direction::Right)), entry(2, Some(Direction::Down))];
        let results = engine.replay_all(&entries);
        let stats = engine.generate_stats(&results);

        assert_eq!(stats.total_rounds, 2);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.mismatches, 1);
        assert!((stats.match_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_expected_moves() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![entry(1, Some(Direction::Right)), entry(2, None)];

        assert!(engine
            .validate_expected_moves(&entries, &[(1, vec![Direction::Right, Direction::Down])])
            .is_ok());
        assert!(matches!(
            engine.validate_expected_moves(&entries, &[(2, vec![Direction::Down])]),
            Err(ReplayError::UnexpectedMove { round: 2, .. })
        ));
        assert!(matches!(
            engine.validate_expected_moves(&entries, &[(9, vec![Direction::Down])]),
            Err(ReplayError::RoundNotFound(9))
        ));
    }
}
