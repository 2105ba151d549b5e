// Move applier: the single state transition used by both search and live play
//
// `apply_move` borrows its inputs and returns owned copies, so the caller decides
// whether the result replaces live state or stays a hypothetical child node.

use serde::{Deserialize, Serialize};

use crate::agent::Agents;
use crate::board::Board;
use crate::error::GameError;
use crate::types::{CoinState, Direction};

/// Coin and streak scoring rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoringRules {
    /// Streak length from which collections earn `streak² − streak` extra points
    pub streak_bonus_threshold: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringRules {
            streak_bonus_threshold: 3,
        }
    }
}

impl ScoringRules {
    /// Bonus awarded on top of the base point for a collection that brings the
    /// streak to `streak`
    pub fn streak_bonus(&self, streak: u32) -> u32 {
        if streak >= self.streak_bonus_threshold {
            streak * streak - streak
        } else {
            0
        }
    }

    /// Points added by a collection that brings the streak to `streak`
    pub fn collection_points(&self, streak: u32) -> u32 {
        1 + self.streak_bonus(streak)
    }
}

/// Post-move state produced by `apply_move`
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub board: Board,
    pub agents: Agents,
    pub score_delta: u32,
    pub collected: bool,
}

/// Moves agent `mover` one step in `direction` and scores the landing cell
///
/// Landing on a visible coin collects it, extends the streak and awards
/// `rules.collection_points`. Landing anywhere else (including on a hidden coin)
/// resets the streak. Marker and score change together in the returned state.
///
/// Fails with `GameError::IllegalMove` when the target is not a valid move;
/// callers are expected to pick from `valid_moves`.
pub fn apply_move(
    board: &Board,
    agents: &Agents,
    mover: usize,
    direction: Direction,
    rules: &ScoringRules,
) -> Result<Transition, GameError> {
    let agent = agents.get(mover).ok_or(GameError::UnknownAgent(mover))?;
    let target = direction.apply(&agent.position);

    if !board.is_move_legal(target, agents) {
        return Err(GameError::IllegalMove {
            agent: mover,
            from: agent.position,
            direction,
        });
    }

    let mut board = board.clone();
    let mut agents = *agents;
    let agent = &mut agents[mover];
    agent.position = target;

    let collected = board.get(target) == Some(CoinState::Visible);
    let score_delta = if collected {
        board.set(target, CoinState::Empty);
        agent.streak += 1;
        let points = rules.collection_points(agent.streak);
        agent.score += points;
        points
    } else {
        agent.streak = 0;
        0
    };

    Ok(Transition {
        board,
        agents,
        score_delta,
        collected,
    })
}

/// Collects visible coins that agents are standing on when the game starts
///
/// Each such agent scores one point and starts a streak of one. Returns the
/// indices of the agents that collected.
pub fn collect_starting_coins(board: &mut Board, agents: &mut Agents) -> Vec<usize> {
    let mut collectors = Vec::new();

    for (index, agent) in agents.iter_mut().enumerate() {
        if board.get(agent.position) == Some(CoinState::Visible) {
            board.set(agent.position, CoinState::Empty);
            agent.score += 1;
            agent.streak += 1;
            collectors.push(index);
        }
    }

    collectors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::types::Coord;

    fn two_agents(a: Coord, b: Coord) -> Agents {
        [Agent::new(a), Agent::new(b)]
    }

    #[test]
    fn test_streak_bonus_formula() {
        let rules = ScoringRules::default();
        assert_eq!(rules.collection_points(1), 1);
        assert_eq!(rules.collection_points(2), 1);
        assert_eq!(rules.collection_points(3), 7);
        assert_eq!(rules.collection_points(4), 13);
        assert_eq!(rules.streak_bonus(5), 20);
    }

    #[test]
    fn test_custom_threshold_changes_bonus_start() {
        let rules = ScoringRules {
            streak_bonus_threshold: 2,
        };
        assert_eq!(rules.collection_points(2), 3);
        assert_eq!(rules.collection_points(1), 1);
    }

    #[test]
    fn test_collecting_visible_coin() {
        let board = Board::from_rows(&[". o", ". ."]).unwrap();
        let agents = two_agents(Coord::new(0, 0), Coord::new(1, 1));

        let t = apply_move(&board, &agents, 0, Direction::Right, &ScoringRules::default()).unwrap();

        assert!(t.collected);
        assert_eq!(t.score_delta, 1);
        assert_eq!(t.agents[0].position, Coord::new(0, 1));
        assert_eq!(t.agents[0].score, 1);
        assert_eq!(t.agents[0].streak, 1);
        assert_eq!(t.board.get(Coord::new(0, 1)), Some(CoinState::Empty));
        assert_eq!(t.agents[1], agents[1]);
    }

    #[test]
    fn test_hidden_coin_resets_streak_without_scoring() {
        let board = Board::from_rows(&[". x", ". ."]).unwrap();
        let mut agents = two_agents(Coord::new(0, 0), Coord::new(1, 1));
        agents[0].score = 5;
        agents[0].streak = 2;

        let t = apply_move(&board, &agents, 0, Direction::Right, &ScoringRules::default()).unwrap();

        assert!(!t.collected);
        assert_eq!(t.score_delta, 0);
        assert_eq!(t.agents[0].score, 5);
        assert_eq!(t.agents[0].streak, 0);
        assert_eq!(t.board.get(Coord::new(0, 1)), Some(CoinState::Hidden));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let board = Board::from_rows(&["o o", ". ."]).unwrap();
        let agents = two_agents(Coord::new(1, 0), Coord::new(1, 1));
        let board_before = board.clone();

        apply_move(&board, &agents, 0, Direction::Up, &ScoringRules::default()).unwrap();

        assert_eq!(board, board_before);
        assert_eq!(agents[0].position, Coord::new(1, 0));
        assert_eq!(agents[0].score, 0);
    }

    #[test]
    fn test_illegal_moves_are_rejected() {
        let board = Board::empty(2);
        let agents = two_agents(Coord::new(0, 0), Coord::new(0, 1));
        let rules = ScoringRules::default();

        assert_eq!(
            apply_move(&board, &agents, 0, Direction::Up, &rules),
            Err(GameError::IllegalMove {
                agent: 0,
                from: Coord::new(0, 0),
                direction: Direction::Up,
            })
        );
        assert!(apply_move(&board, &agents, 0, Direction::Right, &rules).is_err());
        assert_eq!(
            apply_move(&board, &agents, 2, Direction::Down, &rules),
            Err(GameError::UnknownAgent(2))
        );
    }

    #[test]
    fn test_starting_coins_are_collected() {
        let mut board = Board::from_rows(&["o .", ". ."]).unwrap();
        let mut agents = two_agents(Coord::new(0, 0), Coord::new(1, 1));

        let collectors = collect_starting_coins(&mut board, &mut agents);

        assert_eq!(collectors, vec![0]);
        assert_eq!(agents[0].score, 1);
        assert_eq!(agents[0].streak, 1);
        assert_eq!(agents[1].score, 0);
        assert_eq!(board.remaining_coin_count(), 0);
    }
}
