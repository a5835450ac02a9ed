//! The N×N board.
//!
//! The `Board` owns every live [`Unit`]. Each cell holds at most one unit and
//! a unit is only ever stored in the cell named by its `position`, so the
//! one-unit-per-cell invariant is structural. Precondition violations
//! (inserting into an occupied cell, removing from an empty one) are bugs in
//! the caller and panic.
//!
//! ## Usage
//!
//! ```
//! use tile_merge::core::{Board, Direction, Position};
//!
//! let mut board = Board::from_rows(&[
//!     vec![2, 0, 0, 2],
//!     vec![0, 0, 0, 0],
//!     vec![0, 0, 0, 0],
//!     vec![0, 0, 0, 0],
//! ]).unwrap();
//!
//! let found = board.find_farthest_position(Position::new(3, 0), Direction::Left);
//! assert_eq!(found.farthest, Position::new(1, 0));
//! assert_eq!(found.next, Some(Position::new(0, 0)));
//! ```

use super::config::MAX_TILE_VALUE;
use super::error::SnapshotError;
use super::position::{Direction, Position};
use super::rng::GameRng;
use super::snapshot::{BoardSnapshot, CellSnapshot};
use super::unit::{Unit, UnitId};

/// Result of scanning along a vector from a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FarthestPosition {
    /// Last empty in-bounds cell reached (the start cell if none).
    pub farthest: Position,
    /// First blocking cell past `farthest`, or `None` if the scan left the
    /// board.
    pub next: Option<Position>,
}

/// Grid of cells, stored column-major (`x * size + y`).
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Unit>>,
    next_id: u32,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "board size must be positive");
        Self {
            size,
            cells: vec![None; size * size],
            next_id: 0,
        }
    }

    /// Rebuild a board from a snapshot, validating it first.
    ///
    /// Unit identity is not preserved; values and positions are.
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;

        let mut board = Self::new(snapshot.size);
        for cell in snapshot.occupied() {
            let id = board.alloc_id();
            board.insert_tile(Unit::new(id, cell.position, cell.value));
        }
        Ok(board)
    }

    /// Build a board from rows of values (`rows[y][x]`, 0 = empty).
    pub fn from_rows(rows: &[Vec<u32>]) -> Result<Self, SnapshotError> {
        let size = rows.len();
        let mut snapshot = BoardSnapshot::empty(size);

        for (y, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(SnapshotError::ColumnCount {
                    expected: size,
                    found: row.len(),
                });
            }
            for (x, &value) in row.iter().enumerate() {
                if value != 0 {
                    snapshot.cells[x][y] = Some(CellSnapshot {
                        position: Position::new(x, y),
                        value,
                    });
                }
            }
        }

        Self::from_snapshot(&snapshot)
    }

    /// Board edge length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Allocate an id for a new unit.
    pub fn alloc_id(&mut self) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        id
    }

    fn index(&self, position: Position) -> usize {
        position.x * self.size + position.y
    }

    /// Is `position` on the board?
    #[must_use]
    pub fn within_bounds(&self, position: Position) -> bool {
        position.x < self.size && position.y < self.size
    }

    /// The unit at `position`, if any. Out-of-bounds positions are empty.
    #[must_use]
    pub fn cell_content(&self, position: Position) -> Option<&Unit> {
        if !self.within_bounds(position) {
            return None;
        }
        self.cells[self.index(position)].as_ref()
    }

    /// Does `position` hold no unit?
    #[must_use]
    pub fn cell_available(&self, position: Position) -> bool {
        self.cell_content(position).is_none()
    }

    /// Is at least one cell empty?
    #[must_use]
    pub fn cells_available(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    /// All empty positions in column-major order.
    #[must_use]
    pub fn available_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        self.each_cell(|position, unit| {
            if unit.is_none() {
                cells.push(position);
            }
        });
        cells
    }

    /// Pick an empty position uniformly at random.
    ///
    /// Returns `None` on a full board; callers check `cells_available` first.
    pub fn random_available_cell(&self, rng: &mut GameRng) -> Option<Position> {
        rng.pick(&self.available_cells()).copied()
    }

    /// Place `unit` at its own position.
    ///
    /// # Panics
    ///
    /// If the position is off the board or already occupied.
    pub fn insert_tile(&mut self, unit: Unit) {
        let position = unit.position;
        assert!(self.within_bounds(position), "insert out of bounds at {position}");
        let index = self.index(position);
        assert!(self.cells[index].is_none(), "insert into occupied cell {position}");
        self.cells[index] = Some(unit);
    }

    /// Take the unit out of `position`.
    ///
    /// # Panics
    ///
    /// If the cell is empty or off the board.
    pub fn remove_tile(&mut self, position: Position) -> Unit {
        assert!(self.within_bounds(position), "remove out of bounds at {position}");
        let index = self.index(position);
        match self.cells[index].take() {
            Some(unit) => unit,
            None => panic!("remove from empty cell {position}"),
        }
    }

    /// Slide the unit at `from` to the empty cell `to`.
    pub fn move_tile(&mut self, from: Position, to: Position) {
        if from == to {
            return;
        }
        let mut unit = self.remove_tile(from);
        unit.update_position(to);
        self.insert_tile(unit);
    }

    /// Visit every cell, `x` outer and `y` inner.
    pub fn each_cell(&self, mut visit: impl FnMut(Position, Option<&Unit>)) {
        for x in 0..self.size {
            for y in 0..self.size {
                let position = Position::new(x, y);
                visit(position, self.cells[self.index(position)].as_ref());
            }
        }
    }

    /// Visit every live unit mutably.
    pub fn each_unit_mut(&mut self, mut visit: impl FnMut(&mut Unit)) {
        for unit in self.cells.iter_mut().flatten() {
            visit(unit);
        }
    }

    /// Iterate live units in column-major order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.cells.iter().flatten()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.units().count()
    }

    /// Scan from `start` along `direction` while the next cell is on the
    /// board and empty.
    #[must_use]
    pub fn find_farthest_position(&self, start: Position, direction: Direction) -> FarthestPosition {
        let mut farthest = start;
        loop {
            match farthest.offset(direction) {
                Some(candidate) if self.within_bounds(candidate) => {
                    if self.cell_available(candidate) {
                        farthest = candidate;
                    } else {
                        return FarthestPosition {
                            farthest,
                            next: Some(candidate),
                        };
                    }
                }
                _ => return FarthestPosition { farthest, next: None },
            }
        }
    }

    /// Does any unit have an orthogonal neighbour of equal value it can
    /// merge with?
    #[must_use]
    pub fn tile_matches_available(&self) -> bool {
        self.units().filter(|unit| unit.value < MAX_TILE_VALUE).any(|unit| {
            Direction::ALL.iter().any(|&direction| {
                unit.position
                    .offset(direction)
                    .and_then(|neighbour| self.cell_content(neighbour))
                    .is_some_and(|other| other.value == unit.value)
            })
        })
    }

    /// Serialize sizes and occupied cells.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snapshot = BoardSnapshot::empty(self.size);
        for unit in self.units() {
            snapshot.cells[unit.position.x][unit.position.y] = Some(CellSnapshot {
                position: unit.position,
                value: unit.value,
            });
        }
        snapshot
    }

    /// Values as rows (`rows[y][x]`, 0 = empty).
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        (0..self.size)
            .map(|y| {
                (0..self.size)
                    .map(|x| self.cell_content(Position::new(x, y)).map_or(0, |unit| unit.value))
                    .collect()
            })
            .collect()
    }
}

/// Boards are equal when they have the same size and the same values in the
/// same cells. Unit ids and transient move state are ignored.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(a, b)| a.as_ref().map(|u| u.value) == b.as_ref().map(|u| u.value))
    }
}

impl Eq for Board {}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.to_rows() {
            let line: Vec<String> = row
                .iter()
                .map(|&value| {
                    if value == 0 {
                        format!("{:>6}", ".")
                    } else {
                        format!("{value:>6}")
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_at(board: &mut Board, x: usize, y: usize, value: u32) -> Unit {
        let id = board.alloc_id();
        Unit::new(id, Position::new(x, y), value)
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(4);
        assert_eq!(board.size(), 4);
        assert!(board.cells_available());
        assert_eq!(board.available_cells().len(), 16);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut board = Board::new(4);
        let unit = unit_at(&mut board, 1, 2, 4);
        board.insert_tile(unit);

        assert!(!board.cell_available(Position::new(1, 2)));
        assert_eq!(board.cell_content(Position::new(1, 2)).unwrap().value, 4);
        assert_eq!(board.available_cells().len(), 15);

        let removed = board.remove_tile(Position::new(1, 2));
        assert_eq!(removed.value, 4);
        assert!(board.cell_available(Position::new(1, 2)));
    }

    #[test]
    #[should_panic(expected = "insert into occupied cell")]
    fn test_insert_into_occupied_panics() {
        let mut board = Board::new(4);
        let first = unit_at(&mut board, 0, 0, 2);
        let second = unit_at(&mut board, 0, 0, 2);
        board.insert_tile(first);
        board.insert_tile(second);
    }

    #[test]
    #[should_panic(expected = "remove from empty cell")]
    fn test_remove_from_empty_panics() {
        let mut board = Board::new(4);
        board.remove_tile(Position::new(3, 3));
    }

    #[test]
    fn test_within_bounds() {
        let board = Board::new(4);
        assert!(board.within_bounds(Position::new(3, 3)));
        assert!(!board.within_bounds(Position::new(4, 0)));
        assert!(!board.within_bounds(Position::new(0, 4)));
        assert!(board.cell_content(Position::new(9, 9)).is_none());
    }

    #[test]
    fn test_random_available_cell() {
        let mut rng = GameRng::new(42);
        let board = Board::from_rows(&[vec![2, 2], vec![2, 0]]).unwrap();
        for _ in 0..10 {
            assert_eq!(board.random_available_cell(&mut rng), Some(Position::new(1, 1)));
        }

        let full = Board::from_rows(&[vec![2, 4], vec![4, 2]]).unwrap();
        assert!(!full.cells_available());
        assert_eq!(full.random_available_cell(&mut rng), None);
    }

    #[test]
    fn test_find_farthest_position() {
        let board = Board::from_rows(&[
            vec![0, 0, 4, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();

        let left = board.find_farthest_position(Position::new(2, 0), Direction::Left);
        assert_eq!(left, FarthestPosition { farthest: Position::new(0, 0), next: None });

        let down = board.find_farthest_position(Position::new(2, 0), Direction::Down);
        assert_eq!(down.farthest, Position::new(2, 3));
        assert_eq!(down.next, None);

        let blocked = board.find_farthest_position(Position::new(0, 0), Direction::Right);
        assert_eq!(blocked.farthest, Position::new(1, 0));
        assert_eq!(blocked.next, Some(Position::new(2, 0)));
    }

    #[test]
    fn test_tile_matches_available() {
        let no_match = Board::from_rows(&[vec![2, 4], vec![4, 2]]).unwrap();
        assert!(!no_match.tile_matches_available());

        let vertical = Board::from_rows(&[vec![2, 4], vec![2, 8]]).unwrap();
        assert!(vertical.tile_matches_available());

        let horizontal = Board::from_rows(&[vec![8, 8], vec![2, 4]]).unwrap();
        assert!(horizontal.tile_matches_available());

        let capped = Board::from_rows(&[vec![MAX_TILE_VALUE, MAX_TILE_VALUE], vec![2, 4]]).unwrap();
        assert!(!capped.tile_matches_available());
    }

    #[test]
    fn test_move_tile() {
        let mut board = Board::from_rows(&[vec![0, 2], vec![0, 0]]).unwrap();
        board.move_tile(Position::new(1, 0), Position::new(0, 0));
        assert_eq!(board.to_rows(), vec![vec![2, 0], vec![0, 0]]);
        assert_eq!(board.cell_content(Position::new(0, 0)).unwrap().position, Position::new(0, 0));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let board = Board::from_rows(&[
            vec![2, 0, 0, 0],
            vec![0, 4, 0, 0],
            vec![0, 0, 2048, 0],
            vec![0, 0, 0, 32768],
        ])
        .unwrap();

        let snapshot = board.snapshot();
        assert_eq!(snapshot.cells[2][2].unwrap().value, 2048);

        let restored = Board::from_snapshot(&snapshot).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        assert!(Board::from_rows(&[vec![2, 0], vec![0]]).is_err());
        assert!(Board::from_rows(&[vec![3, 0], vec![0, 0]]).is_err());
    }

    #[test]
    fn test_equality_ignores_ids() {
        let mut a = Board::new(2);
        let mut b = Board::new(2);
        let _ = b.alloc_id();
        let ua = unit_at(&mut a, 0, 1, 8);
        let ub = unit_at(&mut b, 0, 1, 8);
        a.insert_tile(ua);
        b.insert_tile(ub);
        assert_eq!(a, b);

        let uc = unit_at(&mut b, 1, 1, 2);
        b.insert_tile(uc);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let board = Board::from_rows(&[vec![2, 0], vec![0, 16]]).unwrap();
        assert_eq!(format!("{board}"), "     2     .\n     .    16\n");
    }
}
