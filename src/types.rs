// Shared game types: coordinates, directions and cell markers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinate, row 0 is the top row and column 0 the left column
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub fn new(row: i32, col: i32) -> Self {
        Coord { row, col }
    }

    /// Number of orthogonal steps between two coordinates, ignoring obstacles
    pub fn manhattan_distance(&self, other: &Coord) -> u32 {
        (self.row - other.row).unsigned_abs() + (self.col - other.col).unsigned_abs()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Represents the four possible movement directions for an agent
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions in move generation order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Lowercase name used in logs and CLI arguments
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses the lowercase (or mixed case) direction name
    pub fn parse(s: &str) -> Option<Direction> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { row: coord.row - 1, col: coord.col },
            Direction::Down => Coord { row: coord.row + 1, col: coord.col },
            Direction::Left => Coord { row: coord.row, col: coord.col - 1 },
            Direction::Right => Coord { row: coord.row, col: coord.col + 1 },
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coin marker stored in each board cell
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoinState {
    #[default]
    Empty,
    /// Collectible by landing on the cell
    Visible,
    /// Present but not collectible until it becomes visible again
    Hidden,
}

impl CoinState {
    pub fn is_coin(&self) -> bool {
        !matches!(self, CoinState::Empty)
    }
}

/// A single Visible <-> Hidden flip produced by the visibility toggle
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityChange {
    pub coord: Coord,
    pub state: CoinState,
}

/// Index of the other agent in a two-agent game
pub fn opponent(agent: usize) -> usize {
    1 - agent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_moves_one_step() {
        let origin = Coord::new(3, 3);
        assert_eq!(Direction::Up.apply(&origin), Coord::new(2, 3));
        assert_eq!(Direction::Down.apply(&origin), Coord::new(4, 3));
        assert_eq!(Direction::Left.apply(&origin), Coord::new(3, 2));
        assert_eq!(Direction::Right.apply(&origin), Coord::new(3, 4));

        for dir in Direction::all() {
            assert_eq!(origin.manhattan_distance(&dir.apply(&origin)), 1);
        }
    }

    #[test]
    fn test_direction_parse_roundtrips_names() {
        for dir in Direction::all() {
            assert_eq!(Direction::parse(dir.as_str()), Some(dir));
        }
        assert_eq!(Direction::parse("UP"), Some(Direction::Up));
        assert_eq!(Direction::parse("north"), None);
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, "\"left\"");
    }

    #[test]
    fn test_only_empty_is_not_a_coin() {
        assert!(!CoinState::Empty.is_coin());
        assert!(CoinState::Visible.is_coin());
        assert!(CoinState::Hidden.is_coin());
    }
}
