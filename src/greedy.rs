// One-step greedy move choice, the alternative to minimax play
//
// A move onto a visible coin is always taken. Otherwise each move is scored by
// how close it lands to the nearest visible coin, with both agents blocking
// the path.

use crate::agent::{valid_moves, Agents};
use crate::board::Board;
use crate::search::SearchResult;
use crate::types::{CoinState, Direction};

/// Score of a move for agent `mover`
///
/// `+inf` when the move collects, `1 / (distance + 1)` towards the nearest
/// visible coin otherwise, and 0 when no coin is reachable.
pub fn move_score(board: &Board, agents: &Agents, mover: usize, direction: Direction) -> f64 {
    let target = direction.apply(&agents[mover].position);
    if board.get(target) == Some(CoinState::Visible) {
        return f64::INFINITY;
    }

    match board.nearest_coin_distance_avoiding(target, agents) {
        Some(distance) => 1.0 / (distance as f64 + 1.0),
        None => 0.0,
    }
}

/// Picks the highest scoring legal move; the first one wins ties
///
/// The result has the same shape as a minimizing search root: `tied_moves`
/// holds only the chosen move, and a boxed-in agent gets `None` with a
/// score of `-inf`.
pub fn choose_move(board: &Board, agents: &Agents, mover: usize) -> SearchResult {
    let mut best = f64::NEG_INFINITY;
    let mut best_move = None;

    for dir in valid_moves(agents, mover, board) {
        let score = move_score(board, agents, mover, dir);
        if score > best {
            best = score;
            best_move = Some(dir);
        }
    }

    SearchResult {
        score: best,
        best_move,
        tied_moves: best_move.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::types::Coord;

    fn agents_at(a: (i32, i32), b: (i32, i32)) -> Agents {
        [Agent::new(Coord::new(a.0, a.1)), Agent::new(Coord::new(b.0, b.1))]
    }

    #[test]
    fn test_takes_adjacent_coin() {
        let board = Board::from_rows(&[". . .", ". . o", ". o ."]).unwrap();
        let agents = agents_at((1, 1), (0, 0));

        let result = choose_move(&board, &agents, 0);
        // Down and Right both collect; Down comes first
        assert_eq!(result.best_move, Some(Direction::Down));
        assert_eq!(result.score, f64::INFINITY);
    }

    #[test]
    fn test_heads_for_nearest_coin() {
        let board = Board::from_rows(&[
            ". . . . .",
            ". . . . .",
            ". . . . .",
            ". . . . .",
            "o . . . .",
        ])
        .unwrap();
        let agents = agents_at((1, 1), (0, 4));

        let result = choose_move(&board, &agents, 0);
        // Down lands 3 steps away, Left 3 as well but Down is generated first
        assert_eq!(result.best_move, Some(Direction::Down));
        assert!((result.score - 0.25).abs() < 1e-9);
        assert!((move_score(&board, &agents, 0, Direction::Up) - 1.0 / 6.0).abs() < 1e-9);
        assert!((move_score(&board, &agents, 0, Direction::Right) - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_agents_block_the_path() {
        let board = Board::from_rows(&[". . . o", ". . . .", ". . . .", ". . . ."]).unwrap();
        let agents = agents_at((0, 1), (0, 2));

        // Going left means walking back around both agents
        assert_eq!(board.nearest_coin_distance(Coord::new(0, 0)), Some(3));
        assert!((move_score(&board, &agents, 0, Direction::Left) - 1.0 / 6.0).abs() < 1e-9);

        let result = choose_move(&board, &agents, 0);
        assert_eq!(result.best_move, Some(Direction::Down));
        assert!((result.score - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_boxed_in_agent_passes() {
        let board = Board::from_rows(&["o"]).unwrap();
        let agents = agents_at((0, 0), (3, 3));

        let result = choose_move(&board, &agents, 0);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, f64::NEG_INFINITY);
        assert!(result.tied_moves.is_empty());
    }
}
