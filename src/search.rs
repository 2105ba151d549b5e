// Depth-bounded minimax with alpha-beta pruning
//
// Every node expands into owned child states produced by `apply_move`, so the
// board and agents handed to `search` are never mutated. Leaves are always
// scored from the root agent's perspective; the maximizing flag only decides
// which side is being optimized at a ply.

use log::{debug, warn};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::agent::{valid_moves, Agents};
use crate::board::Board;
use crate::config::SearchConfig;
use crate::evaluator::evaluate;
use crate::moves::{apply_move, ScoringRules, Transition};
use crate::types::{opponent, Direction};

/// Outcome of a search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Minimax value from the root perspective. When the agent to move has no
    /// legal move this is the untouched initial bound (±infinity).
    pub score: f64,
    /// Chosen move, `None` at a terminal position or when the agent is boxed in
    pub best_move: Option<Direction>,
    /// All moves sharing the best score at a maximizing root, in generation
    /// order. A minimizing root reports only its chosen move.
    pub tied_moves: Vec<Direction>,
}

/// Counters for the most recent search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub evaluations: u64,
    pub cutoffs: u64,
    pub budget_exhausted: bool,
}

/// Seed of the tie-breaking RNG for the search of a given round
///
/// The game loop and the replay tool both derive it from the game seed, so a
/// replayed search draws exactly the same ties.
pub fn turn_seed(game_seed: u64, round: u32) -> u64 {
    game_seed.wrapping_add(u64::from(round))
}

/// Minimax searcher with an injected random source for tie-breaking
pub struct Searcher<R: Rng> {
    config: SearchConfig,
    rules: ScoringRules,
    rng: R,
    stats: SearchStats,
    perspective: usize,
}

impl<R: Rng> Searcher<R> {
    /// A `config.depth` of 0 scores the root itself as a leaf and returns no
    /// move; `Config::validate` rejects it for configured games.
    pub fn new(config: SearchConfig, rules: ScoringRules, rng: R) -> Self {
        Searcher {
            config,
            rules,
            rng,
            stats: SearchStats::default(),
            perspective: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Statistics of the last completed search
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Searches for the best move of agent `to_move` at the configured depth
    pub fn best_move(&mut self, board: &Board, agents: &Agents, to_move: usize) -> SearchResult {
        self.search(
            self.config.depth,
            to_move,
            true,
            f64::NEG_INFINITY,
            f64::INFINITY,
            board,
            agents,
        )
    }

    /// Runs minimax from the given node
    ///
    /// The root perspective is `to_move` when `maximizing`, otherwise the other
    /// agent. At a maximizing root the move is drawn uniformly from all moves
    /// tied for the best score; at a minimizing root the first minimal move wins.
    #[allow(clippy::too_many_arguments)]
    pub fn search(
        &mut self,
        depth: u32,
        to_move: usize,
        maximizing: bool,
        alpha: f64,
        beta: f64,
        board: &Board,
        agents: &Agents,
    ) -> SearchResult {
        self.stats = SearchStats::default();
        self.perspective = if maximizing { to_move } else { opponent(to_move) };

        let result = if maximizing {
            self.search_max_root(depth, to_move, alpha, beta, board, agents)
        } else {
            self.search_min_root(depth, to_move, alpha, beta, board, agents)
        };

        debug!(
            "Search depth {} for agent {}: move {:?}, score {:.3}, ties {}, nodes {}, evals {}, cutoffs {}{}",
            depth,
            to_move,
            result.best_move.map(|m| m.as_str()),
            result.score,
            result.tied_moves.len(),
            self.stats.nodes,
            self.stats.evaluations,
            self.stats.cutoffs,
            if self.stats.budget_exhausted { " (node budget hit)" } else { "" },
        );

        result
    }

    fn search_max_root(
        &mut self,
        depth: u32,
        to_move: usize,
        mut alpha: f64,
        beta: f64,
        board: &Board,
        agents: &Agents,
    ) -> SearchResult {
        if let Some(score) = self.leaf_score(depth, board, agents) {
            return SearchResult {
                score,
                best_move: None,
                tied_moves: vec![],
            };
        }

        let mut best = f64::NEG_INFINITY;
        let mut tied_moves = Vec::new();

        for dir in valid_moves(agents, to_move, board) {
            let Some(child) = self.expand(board, agents, to_move, dir) else {
                continue;
            };
            let cutoffs_before = self.stats.cutoffs;
            let window_alpha = alpha;
            let value = self.value(depth - 1, opponent(to_move), false, alpha, beta, &child);

            if value > best {
                best = value;
                tied_moves.clear();
                tied_moves.push(dir);
            } else if value == best {
                // A pruned subtree may report a bound on the window edge instead
                // of its exact value; only then is the child searched again
                let pruned = self.stats.cutoffs != cutoffs_before;
                let exact = !self.config.alpha_beta
                    || !pruned
                    || (window_alpha < value && value < beta);
                let confirmed = exact
                    || self.value(
                        depth - 1,
                        opponent(to_move),
                        false,
                        f64::NEG_INFINITY,
                        f64::INFINITY,
                        &child,
                    ) == best;
                if confirmed {
                    tied_moves.push(dir);
                }
            }

            alpha = alpha.max(value);
            if self.config.alpha_beta && beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        let best_move = tied_moves.choose(&mut self.rng).copied();
        SearchResult {
            score: best,
            best_move,
            tied_moves,
        }
    }

    fn search_min_root(
        &mut self,
        depth: u32,
        to_move: usize,
        alpha: f64,
        mut beta: f64,
        board: &Board,
        agents: &Agents,
    ) -> SearchResult {
        if let Some(score) = self.leaf_score(depth, board, agents) {
            return SearchResult {
                score,
                best_move: None,
                tied_moves: vec![],
            };
        }

        let mut best = f64::INFINITY;
        let mut best_move = None;

        for dir in valid_moves(agents, to_move, board) {
            let Some(child) = self.expand(board, agents, to_move, dir) else {
                continue;
            };
            let value = self.value(depth - 1, opponent(to_move), true, alpha, beta, &child);

            if value < best {
                best = value;
                best_move = Some(dir);
            }

            beta = beta.min(value);
            if self.config.alpha_beta && beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        SearchResult {
            score: best,
            best_move,
            tied_moves: best_move.into_iter().collect(),
        }
    }

    /// Minimax value of a child node; moves below the root are never reported
    fn value(
        &mut self,
        depth: u32,
        to_move: usize,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
        node: &Transition,
    ) -> f64 {
        let (board, agents) = (&node.board, &node.agents);
        if let Some(score) = self.leaf_score(depth, board, agents) {
            return score;
        }

        if maximizing {
            let mut best = f64::NEG_INFINITY;
            for dir in valid_moves(agents, to_move, board) {
                let Some(child) = self.expand(board, agents, to_move, dir) else {
                    continue;
                };
                let value = self.value(depth - 1, opponent(to_move), false, alpha, beta, &child);
                best = best.max(value);
                alpha = alpha.max(value);
                if self.config.alpha_beta && beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for dir in valid_moves(agents, to_move, board) {
                let Some(child) = self.expand(board, agents, to_move, dir) else {
                    continue;
                };
                let value = self.value(depth - 1, opponent(to_move), true, alpha, beta, &child);
                best = best.min(value);
                beta = beta.min(value);
                if self.config.alpha_beta && beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            best
        }
    }

    /// Counts the node and returns its static score if it is a leaf
    fn leaf_score(&mut self, depth: u32, board: &Board, agents: &Agents) -> Option<f64> {
        self.stats.nodes += 1;

        let over_budget = self.config.max_nodes > 0 && self.stats.nodes > self.config.max_nodes;
        if over_budget {
            self.stats.budget_exhausted = true;
        }

        if depth == 0 || board.remaining_coin_count() == 0 || over_budget {
            self.stats.evaluations += 1;
            Some(evaluate(self.perspective, board, agents))
        } else {
            None
        }
    }

    fn expand(
        &self,
        board: &Board,
        agents: &Agents,
        to_move: usize,
        dir: Direction,
    ) -> Option<Transition> {
        match apply_move(board, agents, to_move, dir, &self.rules) {
            Ok(child) => Some(child),
            Err(e) => {
                warn!("Skipping move during search: {}", e);
                None
            }
        }
    }
}
