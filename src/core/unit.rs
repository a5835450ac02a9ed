//! Tiles ("units") and their merge provenance.
//!
//! A `Unit` carries an immutable value and a mutable position. During a
//! move it also remembers where it started (`previous_position`) and, if it
//! was produced by a merge, which two units it consumed (`provenance`).
//! Both are transient: they are reset at the start of every move and never
//! persisted.
//!
//! ```
//! use tile_merge::core::{Position, Provenance, Unit, UnitId};
//!
//! let mut unit = Unit::new(UnitId(7), Position::new(0, 0), 2);
//! unit.save_position();
//! unit.update_position(Position::new(3, 0));
//!
//! assert_eq!(unit.previous_position, Some(Position::new(0, 0)));
//! assert_eq!(unit.provenance, Provenance::None);
//! ```

use serde::{Deserialize, Serialize};

use super::position::Position;

/// Identifier of a unit, unique within one board's lifetime.
///
/// Ids are handed out by [`Board::alloc_id`](super::Board::alloc_id) and are
/// only used to resolve merge provenance for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

/// Where a unit came from during the current move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// Spawned, placed, or carried over from an earlier move.
    #[default]
    None,
    /// Produced this move by merging the two named units.
    MergedFrom(UnitId, UnitId),
}

/// A value-bearing tile occupying one cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    /// Always positive; a power of two in normal play.
    pub value: u32,
    pub position: Position,
    /// Position held when the in-progress move began.
    pub previous_position: Option<Position>,
    pub provenance: Provenance,
}

impl Unit {
    /// Create a fresh unit with no history.
    #[must_use]
    pub fn new(id: UnitId, position: Position, value: u32) -> Self {
        assert!(value > 0, "unit value must be positive");
        Self {
            id,
            value,
            position,
            previous_position: None,
            provenance: Provenance::None,
        }
    }

    /// Create the unit produced by merging `sources` at `position`.
    #[must_use]
    pub fn merged(id: UnitId, position: Position, value: u32, sources: (UnitId, UnitId)) -> Self {
        let mut unit = Self::new(id, position, value);
        unit.provenance = Provenance::MergedFrom(sources.0, sources.1);
        unit
    }

    /// Remember the current position as the pre-move position.
    pub fn save_position(&mut self) {
        self.previous_position = Some(self.position);
    }

    /// Move to `position` without touching `previous_position`.
    pub fn update_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Forget merge provenance from the previous move.
    pub fn clear_provenance(&mut self) {
        self.provenance = Provenance::None;
    }

    /// Was this unit produced by a merge during the current move?
    #[must_use]
    pub fn is_merged(&self) -> bool {
        matches!(self.provenance, Provenance::MergedFrom(..))
    }

    /// Did this unit change cell since `save_position`?
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.previous_position.is_some_and(|previous| previous != self.position)
    }
}
