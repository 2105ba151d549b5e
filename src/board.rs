// Board: square grid of coin markers with BFS distance queries
//
// The board is plain owned data, so `clone()` is a deep copy. Search look-ahead
// always works on clones and the live board is only mutated by the game loop.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::agent::Agent;
use crate::error::GameError;
use crate::types::{CoinState, Coord, Direction, VisibilityChange};

/// Square grid holding one `CoinState` per cell, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr", into = "BoardRepr")]
pub struct Board {
    size: usize,
    cells: Vec<CoinState>,
}

/// Serialized form, validated on the way back in
#[derive(Serialize, Deserialize)]
struct BoardRepr {
    size: usize,
    cells: Vec<CoinState>,
}

impl TryFrom<BoardRepr> for Board {
    type Error = GameError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        Board::from_cells(repr.size, repr.cells)
    }
}

impl From<Board> for BoardRepr {
    fn from(board: Board) -> Self {
        BoardRepr {
            size: board.size,
            cells: board.cells,
        }
    }
}

impl Board {
    /// Creates a board with no coins
    pub fn empty(size: usize) -> Self {
        Board {
            size,
            cells: vec![CoinState::Empty; size * size],
        }
    }

    /// Creates a board where every cell independently holds a visible coin
    /// with probability `coin_probability`
    ///
    /// # Panics
    /// If `coin_probability` is outside `[0, 1]` or NaN. `Config::validate`
    /// rejects such values for configured games.
    pub fn random<R: Rng>(size: usize, coin_probability: f64, rng: &mut R) -> Self {
        let cells = (0..size * size)
            .map(|_| {
                if rng.random_bool(coin_probability) {
                    CoinState::Visible
                } else {
                    CoinState::Empty
                }
            })
            .collect();

        Board { size, cells }
    }

    /// Builds a board from row-major cells
    pub fn from_cells(size: usize, cells: Vec<CoinState>) -> Result<Self, GameError> {
        let expected = size * size;
        if size == 0 || cells.len() != expected {
            return Err(GameError::BoardShape {
                size,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Board { size, cells })
    }

    /// Parses a text grid, one string per row
    ///
    /// `.` is empty, `o` a visible coin and `x` a hidden coin. Whitespace inside
    /// a row is ignored.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GameError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);

        for row in rows {
            for ch in row.chars().filter(|c| !c.is_whitespace()) {
                let state = match ch {
                    '.' => CoinState::Empty,
                    'o' => CoinState::Visible,
                    'x' => CoinState::Hidden,
                    other => return Err(GameError::BoardCell(other)),
                };
                cells.push(state);
            }
        }

        Self::from_cells(size, cells)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.size
            && (coord.col as usize) < self.size
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.row as usize * self.size + coord.col as usize)
        } else {
            None
        }
    }

    /// Marker at `coord`, or `None` when out of bounds
    pub fn get(&self, coord: Coord) -> Option<CoinState> {
        self.index(coord).map(|idx| self.cells[idx])
    }

    /// Overwrites the marker at `coord` and returns the previous one
    ///
    /// Out-of-bounds writes are ignored and return `None`.
    pub fn set(&mut self, coord: Coord, state: CoinState) -> Option<CoinState> {
        let idx = self.index(coord)?;
        Some(std::mem::replace(&mut self.cells[idx], state))
    }

    /// Iterates over all cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Coord, CoinState)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(idx, &state)| {
            let coord = Coord::new((idx / size) as i32, (idx % size) as i32);
            (coord, state)
        })
    }

    /// True iff `coord` is on the board and no agent currently stands there
    pub fn is_move_legal(&self, coord: Coord, agents: &[Agent]) -> bool {
        self.in_bounds(coord) && !agents.iter().any(|agent| agent.position == coord)
    }

    /// Coins left to collect; hidden coins count as left
    pub fn remaining_coin_count(&self) -> usize {
        self.cells.iter().filter(|state| state.is_coin()).count()
    }

    pub fn visible_coin_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&state| state == CoinState::Visible)
            .count()
    }

    /// Shortest orthogonal path length from `origin` to any visible coin
    ///
    /// Breadth-first search over in-bounds cells. Hidden coins are walked
    /// through but never terminate the search, and agents do not block it.
    /// Returns `None` when no visible coin is reachable (or `origin` is off the
    /// board), which callers treat as an infinite distance.
    pub fn nearest_coin_distance(&self, origin: Coord) -> Option<u32> {
        self.breadth_first(origin, |_| false)
    }

    /// Like `nearest_coin_distance`, but cells occupied by `agents` cannot be
    /// walked through
    ///
    /// `origin` itself is never treated as blocked.
    pub fn nearest_coin_distance_avoiding(&self, origin: Coord, agents: &[Agent]) -> Option<u32> {
        self.breadth_first(origin, |coord| {
            agents.iter().any(|agent| agent.position == coord)
        })
    }

    fn breadth_first<F>(&self, origin: Coord, blocked: F) -> Option<u32>
    where
        F: Fn(Coord) -> bool,
    {
        let start = self.index(origin)?;
        if self.cells[start] == CoinState::Visible {
            return Some(0);
        }

        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back((origin, 0u32));

        while let Some((current, distance)) = queue.pop_front() {
            for dir in Direction::all() {
                let next = dir.apply(&current);
                let Some(idx) = self.index(next) else {
                    continue;
                };
                if visited[idx] || blocked(next) {
                    continue;
                }
                if self.cells[idx] == CoinState::Visible {
                    return Some(distance + 1);
                }
                visited[idx] = true;
                queue.push_back((next, distance + 1));
            }
        }

        None
    }

    /// Flips every visible coin to hidden with `probability`, and every hidden
    /// coin back to visible with the same probability
    ///
    /// Only the live board is toggled; look-ahead sees the visibility frozen at
    /// the moment search began. Returns the cells that changed.
    ///
    /// # Panics
    /// If `probability` is outside `[0, 1]` or NaN and the board holds at
    /// least one coin.
    pub fn toggle_visibility<R: Rng>(
        &mut self,
        rng: &mut R,
        probability: f64,
    ) -> Vec<VisibilityChange> {
        let mut changes = Vec::new();

        for idx in 0..self.cells.len() {
            let flipped = match self.cells[idx] {
                CoinState::Visible => CoinState::Hidden,
                CoinState::Hidden => CoinState::Visible,
                CoinState::Empty => continue,
            };
            if rng.random_bool(probability) {
                self.cells[idx] = flipped;
                changes.push(VisibilityChange {
                    coord: Coord::new((idx / self.size) as i32, (idx % self.size) as i32),
                    state: flipped,
                });
            }
        }

        changes
    }
}
