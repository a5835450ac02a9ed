//! Core rules types: positions, units, the board, snapshots, RNG, configuration.
//!
//! Everything here is independent of how a session is driven. The session
//! controller in [`crate::session`] is the only code that mutates these
//! types during play.

pub mod board;
pub mod config;
pub mod error;
pub mod position;
pub mod rng;
pub mod snapshot;
pub mod unit;

pub use board::{Board, FarthestPosition};
pub use config::{is_tile_value, GameConfig, MAX_BOARD_SIZE, MAX_TILE_VALUE};
pub use error::{ConfigError, SnapshotError, StorageError};
pub use position::{Direction, Position, Traversals};
pub use rng::GameRng;
pub use snapshot::{BoardSnapshot, CellSnapshot, SessionSnapshot, SNAPSHOT_VERSION};
pub use unit::{Provenance, Unit, UnitId};
