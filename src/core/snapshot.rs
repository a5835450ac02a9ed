//! Serialized board and session snapshots.
//!
//! Snapshots are the only form in which state leaves the engine: the undo
//! history, the setup baseline, and persisted games all hold them. The
//! logical JSON shape is
//!
//! ```text
//! { "version": 1,
//!   "grid": { "size": 4, "cells": [[{"position":{"x":0,"y":0},"value":2}, null, ...], ...] },
//!   "score": 0, "over": false, "won": false, "keepPlaying": false }
//! ```
//!
//! where `cells[x][y]` is column-major. Merge provenance and previous
//! positions are transient and never appear here.
//!
//! Data coming from storage is untrusted: call [`SessionSnapshot::validate`]
//! (done by every decode helper here) before rebuilding a board.

use serde::{Deserialize, Serialize};

use super::config::is_tile_value;
use super::error::SnapshotError;
use super::position::Position;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

fn legacy_version() -> u32 {
    1
}

/// One occupied cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub position: Position,
    pub value: u32,
}

/// A board: its size and a column-major cell array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: usize,
    pub cells: Vec<Vec<Option<CellSnapshot>>>,
}

impl BoardSnapshot {
    /// An empty board of `size`.
    #[must_use]
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![None; size]; size],
        }
    }

    /// Check the structural shape and tile values.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.size == 0 {
            return Err(SnapshotError::ZeroSize);
        }
        if self.cells.len() != self.size {
            return Err(SnapshotError::ColumnCount {
                expected: self.size,
                found: self.cells.len(),
            });
        }

        for (x, column) in self.cells.iter().enumerate() {
            if column.len() != self.size {
                return Err(SnapshotError::ColumnLength {
                    column: x,
                    expected: self.size,
                    found: column.len(),
                });
            }

            for (y, cell) in column.iter().enumerate() {
                let Some(cell) = cell else { continue };
                let slot = Position::new(x, y);
                if cell.position != slot {
                    return Err(SnapshotError::MisplacedCell {
                        slot,
                        found: cell.position,
                    });
                }
                if !is_tile_value(cell.value) {
                    return Err(SnapshotError::InvalidValue {
                        position: slot,
                        value: cell.value,
                    });
                }
            }
        }

        Ok(())
    }

    /// Iterate occupied cells in column-major order.
    pub fn occupied(&self) -> impl Iterator<Item = &CellSnapshot> {
        self.cells.iter().flatten().flatten()
    }
}

/// A full session: board plus score and end-of-game flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub grid: BoardSnapshot,
    pub score: u64,
    pub over: bool,
    pub won: bool,
    pub keep_playing: bool,
}

impl SessionSnapshot {
    /// A fresh, not-yet-scored session around `grid`.
    #[must_use]
    pub fn new(grid: BoardSnapshot) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            grid,
            score: 0,
            over: false,
            won: false,
            keep_playing: false,
        }
    }

    /// Set the score.
    #[must_use]
    pub fn with_score(mut self, score: u64) -> Self {
        self.score = score;
        self
    }

    /// Validate the version, board shape, and board size.
    pub fn validate(&self, expected_size: usize) -> Result<(), SnapshotError> {
        if self.version == 0 || self.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        self.grid.validate()?;
        if self.grid.size != expected_size {
            return Err(SnapshotError::SizeMismatch {
                expected: expected_size,
                found: self.grid.size,
            });
        }
        Ok(())
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode and validate a binary snapshot.
    pub fn from_bytes(bytes: &[u8], expected_size: usize) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)?;
        snapshot.validate(expected_size)?;
        Ok(snapshot)
    }

    /// JSON encoding.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode and validate a JSON snapshot.
    pub fn from_json(json: &str, expected_size: usize) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate(expected_size)?;
        Ok(snapshot)
    }
}
