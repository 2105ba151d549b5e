// Agents and move generation

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::GameError;
use crate::types::{Coord, Direction};

/// Both participants, indexed 0 and 1
pub type Agents = [Agent; 2];

/// Display labels used by the renderer and log output
pub const AGENT_LABELS: [char; 2] = ['X', 'Y'];

/// A participant with a grid position, a cumulative score and a coin streak
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub position: Coord,
    pub score: u32,
    /// Consecutive collecting moves immediately preceding now
    pub streak: u32,
}

impl Agent {
    pub fn new(position: Coord) -> Self {
        Agent {
            position,
            score: 0,
            streak: 0,
        }
    }

    pub fn label(index: usize) -> char {
        AGENT_LABELS.get(index).copied().unwrap_or('?')
    }
}

/// Creates the two agents at opposite corners of a `size` board
pub fn starting_agents(size: usize) -> Agents {
    let far = size as i32 - 1;
    [Agent::new(Coord::new(0, 0)), Agent::new(Coord::new(far, far))]
}

/// Checks that both agents stand on the board and on different cells
pub fn check_placement(board: &Board, agents: &Agents) -> Result<(), GameError> {
    for (index, agent) in agents.iter().enumerate() {
        if !board.in_bounds(agent.position) {
            return Err(GameError::AgentOffBoard {
                agent: index,
                at: agent.position,
            });
        }
    }
    if agents[0].position == agents[1].position {
        return Err(GameError::AgentsOverlap(agents[0].position));
    }
    Ok(())
}

/// Generates all legal moves for agent `mover`
///
/// A move is legal if the target cell is on the board and not occupied by
/// either agent. An empty result means the agent is boxed in and must pass.
pub fn valid_moves(agents: &Agents, mover: usize, board: &Board) -> Vec<Direction> {
    let Some(agent) = agents.get(mover) else {
        return vec![];
    };

    Direction::all()
        .iter()
        .filter(|dir| board.is_move_legal(dir.apply(&agent.position), agents))
        .copied()
        .collect()
}
