//! Board coordinates, move directions and traversal order.
//!
//! ## Coordinates
//!
//! `Position { x, y }` addresses a cell with `0 <= x, y < size`. `x` is the
//! column (left to right) and `y` the row (top to bottom), so `Up` moves
//! towards `y = 0`.
//!
//! ## Traversal
//!
//! A move must visit cells starting from the side the tiles slide towards,
//! otherwise a tile that already slid into place could be moved twice in the
//! same pass. [`Traversals`] builds that farthest-first order.
//!
//! ```
//! use tile_merge::core::{Direction, Position, Traversals};
//!
//! let order: Vec<_> = Traversals::new(2, Direction::Right).positions().collect();
//! assert_eq!(order[0], Position::new(1, 0));
//! assert_eq!(order[3], Position::new(0, 1));
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A cell coordinate on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Step one cell in `direction`.
    ///
    /// Returns `None` when the step would leave the board through the top or
    /// left edge. Steps past the bottom/right edge are returned as-is; the
    /// board decides whether they are in bounds.
    #[must_use]
    pub fn offset(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.vector();
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four slide directions.
///
/// The numeric index matches the intent wire format: 0 up, 1 right,
/// 2 down, 3 left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Unit displacement `(dx, dy)` for this direction.
    #[must_use]
    pub const fn vector(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Parse a wire index. Returns `None` for anything outside `0..4`.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Direction::Up),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

/// Farthest-first visiting order for one move.
///
/// Both axes run `0..size`, reversed on an axis whose vector component
/// is `+1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Traversals {
    pub xs: SmallVec<[usize; 8]>,
    pub ys: SmallVec<[usize; 8]>,
}

impl Traversals {
    /// Build the traversal order for a board of `size` moving in `direction`.
    #[must_use]
    pub fn new(size: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.vector();
        let mut xs: SmallVec<[usize; 8]> = (0..size).collect();
        let mut ys: SmallVec<[usize; 8]> = (0..size).collect();

        if dx == 1 {
            xs.reverse();
        }
        if dy == 1 {
            ys.reverse();
        }

        Self { xs, ys }
    }

    /// Iterate positions, `x` outer and `y` inner.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.xs
            .iter()
            .flat_map(move |&x| self.ys.iter().map(move |&y| Position::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors() {
        assert_eq!(Direction::Up.vector(), (0, -1));
        assert_eq!(Direction::Right.vector(), (1, 0));
        assert_eq!(Direction::Down.vector(), (0, 1));
        assert_eq!(Direction::Left.vector(), (-1, 0));
    }

    #[test]
    fn test_from_index() {
        for (index, direction) in (0u8..).zip(Direction::ALL) {
            assert_eq!(Direction::from_index(index), Some(direction));
        }
        assert_eq!(Direction::from_index(4), None);
    }

    #[test]
    fn test_offset_at_edges() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.offset(Direction::Up), None);
        assert_eq!(origin.offset(Direction::Left), None);
        assert_eq!(origin.offset(Direction::Right), Some(Position::new(1, 0)));
        assert_eq!(origin.offset(Direction::Down), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_traversals_reverse_towards_vector() {
        let right = Traversals::new(4, Direction::Right);
        assert_eq!(right.xs.as_slice(), &[3, 2, 1, 0]);
        assert_eq!(right.ys.as_slice(), &[0, 1, 2, 3]);

        let down = Traversals::new(4, Direction::Down);
        assert_eq!(down.xs.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(down.ys.as_slice(), &[3, 2, 1, 0]);

        let left = Traversals::new(4, Direction::Left);
        assert_eq!(left.xs.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(left.ys.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_positions_cover_board_once() {
        let traversals = Traversals::new(3, Direction::Up);
        let positions: Vec<_> = traversals.positions().collect();
        assert_eq!(positions.len(), 9);
        assert_eq!(positions[0], Position::new(0, 0));
        assert_eq!(positions[1], Position::new(0, 1));
        assert_eq!(positions[8], Position::new(2, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Position::new(2, 3)), "(2, 3)");
        assert_eq!(format!("{}", Direction::Left), "left");
    }
}
