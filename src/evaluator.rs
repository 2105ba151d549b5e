// Static evaluation of a position from one agent's point of view

use crate::agent::Agents;
use crate::board::Board;
use crate::types::{opponent, Coord};

/// Added to every BFS distance before inverting it, so standing on a coin
/// scores 10 instead of dividing by zero
pub const PROXIMITY_OFFSET: f64 = 0.1;

/// Scores `board` + `agents` for agent `perspective`; higher is better for it
///
/// The score is the score differential plus the difference of inverse BFS
/// distances to the nearest visible coin.
pub fn evaluate(perspective: usize, board: &Board, agents: &Agents) -> f64 {
    let me = &agents[perspective];
    let them = &agents[opponent(perspective)];

    let score_diff = me.score as f64 - them.score as f64;
    let proximity = proximity_advantage(board, me.position) - proximity_advantage(board, them.position);

    score_diff + proximity
}

/// `1 / (distance + 0.1)`, or 0 when no visible coin is reachable
pub fn proximity_advantage(board: &Board, position: Coord) -> f64 {
    match board.nearest_coin_distance(position) {
        Some(distance) => 1.0 / (distance as f64 + PROXIMITY_OFFSET),
        None => 0.0,
    }
}
