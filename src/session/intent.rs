//! Intents: the commands an input source can issue.
//!
//! Input sources hold a `&mut impl IntentHandler` and call it directly;
//! there is no event registry. [`IntentHandler::handle`] dispatches a
//! value-level [`Intent`] to the matching entry point, which is convenient
//! for replaying scripted input.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, Position};

/// A discrete command from the input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Move(Direction),
    Restart,
    KeepPlaying,
    Undo,
    EnterSetup,
    ExitSetup,
    ResetSetup,
    ClearBoard,
    CycleTile(Position),
}

/// Entry points of a session. Each returns `true` if the intent was
/// accepted and `false` if it was a guarded no-op.
pub trait IntentHandler {
    fn move_tiles(&mut self, direction: Direction) -> bool;

    fn restart(&mut self) -> bool;

    fn keep_playing(&mut self) -> bool;

    fn undo(&mut self) -> bool;

    fn enter_setup(&mut self) -> bool;

    fn exit_setup(&mut self) -> bool;

    fn reset_to_setup(&mut self) -> bool;

    fn clear_board(&mut self) -> bool;

    fn cycle_tile(&mut self, position: Position) -> bool;

    /// Dispatch an intent value.
    fn handle(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Move(direction) => self.move_tiles(direction),
            Intent::Restart => self.restart(),
            Intent::KeepPlaying => self.keep_playing(),
            Intent::Undo => self.undo(),
            Intent::EnterSetup => self.enter_setup(),
            Intent::ExitSetup => self.exit_setup(),
            Intent::ResetSetup => self.reset_to_setup(),
            Intent::ClearBoard => self.clear_board(),
            Intent::CycleTile(position) => self.cycle_tile(position),
        }
    }
}
