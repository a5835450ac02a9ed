//! # tile-merge
//!
//! Rules engine for a sliding tile-merging puzzle on an N×N board.
//!
//! ## Design Principles
//!
//! 1. **Single owner**: the session controller is the only code that mutates
//!    the board, its units, and the session state.
//!
//! 2. **Explicit collaborators**: input, rendering and persistence are
//!    traits (`IntentHandler`, `Actuator`, `StorageManager`), not globals.
//!
//! 3. **Snapshots at the edges**: undo, the setup baseline and persistence
//!    all use one validated, versioned snapshot schema.
//!
//! ## Architecture
//!
//! - **Farthest-first traversal**: a move visits cells starting from the
//!   side tiles slide towards, so each tile moves once and merges never
//!   chain.
//!
//! - **Bounded history**: undo keeps the last `history_depth` snapshots in
//!   an `im::Vector` ring buffer.
//!
//! - **Seedable randomness**: spawns draw from a ChaCha8 `GameRng`, seeded
//!   from configuration for reproducible runs.
//!
//! ## Modules
//!
//! - `core`: positions, units, board, snapshots, RNG, configuration, errors
//! - `session`: controller, intents, undo history
//! - `sinks`: presentation and persistence interfaces plus implementations
//! - `input`: keyboard, swipe and pointer mapping to intents

pub mod core;
pub mod input;
pub mod session;
pub mod sinks;

// Re-export commonly used types
pub use crate::core::{
    Board, BoardSnapshot, CellSnapshot, ConfigError, Direction, GameConfig, GameRng, Position,
    Provenance, SessionSnapshot, SnapshotError, StorageError, Unit, UnitId,
};

pub use crate::session::{History, Intent, IntentHandler, Mode, SessionController};

pub use crate::sinks::{
    Actuator, ActuatorEvent, FileStorage, Frame, MemoryStorage, RecordingActuator, RenderMetadata,
    StorageManager, TileView,
};

pub use crate::input::{Key, KeyboardInput, Modifiers};
