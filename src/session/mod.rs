//! Session orchestration.
//!
//! - [`SessionController`]: owns the board and session state and implements
//!   every intent (moves, undo, restart, setup editing).
//! - [`IntentHandler`] / [`Intent`]: the explicit interface input sources
//!   call into.
//! - [`History`]: the bounded undo stack.

pub mod controller;
pub mod history;
pub mod intent;

pub use controller::{Mode, SessionController};
pub use history::History;
pub use intent::{Intent, IntentHandler};
