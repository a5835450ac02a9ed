//! Output collaborators: the presentation sink and the persistence sink.
//!
//! The session controller pushes to both after every state change and never
//! reads anything back from the presentation side.
//!
//! - [`Actuator`]: receives a [`Frame`] plus [`RenderMetadata`] on every
//!   render, and a few banner/mode notifications.
//! - [`StorageManager`]: best score and the in-progress session.

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, StorageManager};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Board, Position, Provenance, Unit, UnitId};

/// Scalar state sent with every render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderMetadata {
    pub score: u64,
    pub over: bool,
    pub won: bool,
    pub best_score: u64,
    /// `over || (won && !keep_playing)`.
    pub terminated: bool,
}

/// A unit consumed by a merge, as it looked at the end of the move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSource {
    pub id: UnitId,
    pub value: u32,
    /// Where the unit converged to (the merged unit's cell).
    pub position: Position,
    pub previous_position: Option<Position>,
}

impl From<&Unit> for MergeSource {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            value: unit.value,
            position: unit.position,
            previous_position: unit.previous_position,
        }
    }
}

/// One live unit as the renderer sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub id: UnitId,
    pub value: u32,
    pub position: Position,
    pub previous_position: Option<Position>,
    pub merged_from: Option<[MergeSource; 2]>,
}

/// Board contents for one render, with merge provenance resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub size: usize,
    pub tiles: Vec<TileView>,
}

impl Frame {
    /// Capture the board. `retired` holds units merged away this move,
    /// keyed by id; provenance pointing at ids not found there renders as
    /// no provenance.
    #[must_use]
    pub fn capture(board: &Board, retired: &FxHashMap<UnitId, Unit>) -> Self {
        let tiles = board
            .units()
            .map(|unit| {
                let merged_from = match unit.provenance {
                    Provenance::MergedFrom(a, b) => match (retired.get(&a), retired.get(&b)) {
                        (Some(a), Some(b)) => Some([MergeSource::from(a), MergeSource::from(b)]),
                        _ => None,
                    },
                    Provenance::None => None,
                };
                TileView {
                    id: unit.id,
                    value: unit.value,
                    position: unit.position,
                    previous_position: unit.previous_position,
                    merged_from,
                }
            })
            .collect();

        Self {
            size: board.size(),
            tiles,
        }
    }

    /// Value at `position`, if a tile is there.
    #[must_use]
    pub fn value_at(&self, position: Position) -> Option<u32> {
        self.tiles
            .iter()
            .find(|tile| tile.position == position)
            .map(|tile| tile.value)
    }
}

/// Presentation sink.
///
/// Only `actuate` is required; the notifications default to no-ops for
/// front ends without banners or a setup panel.
pub trait Actuator {
    /// Render the board and metadata.
    fn actuate(&mut self, frame: &Frame, metadata: &RenderMetadata);

    /// Clear any won/lost banner.
    fn continue_game(&mut self) {}

    fn enter_setup_mode(&mut self) {}

    fn exit_setup_mode(&mut self) {}

    /// Offer the "reset to setup" control.
    fn show_reset_setup(&mut self) {}

    fn hide_reset_setup(&mut self) {}
}

/// Everything an [`Actuator`] can be told.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActuatorEvent {
    Actuate { frame: Frame, metadata: RenderMetadata },
    ContinueGame,
    EnterSetupMode,
    ExitSetupMode,
    ShowResetSetup,
    HideResetSetup,
}

/// Actuator that keeps every call, for tests and headless replays.
#[derive(Clone, Debug, Default)]
pub struct RecordingActuator {
    events: Vec<ActuatorEvent>,
}

impl RecordingActuator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[ActuatorEvent] {
        &self.events
    }

    /// Number of `actuate` calls.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, ActuatorEvent::Actuate { .. }))
            .count()
    }

    /// The most recent render.
    #[must_use]
    pub fn last_render(&self) -> Option<(&Frame, &RenderMetadata)> {
        self.events.iter().rev().find_map(|event| match event {
            ActuatorEvent::Actuate { frame, metadata } => Some((frame, metadata)),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Actuator for RecordingActuator {
    fn actuate(&mut self, frame: &Frame, metadata: &RenderMetadata) {
        self.events.push(ActuatorEvent::Actuate {
            frame: frame.clone(),
            metadata: *metadata,
        });
    }

    fn continue_game(&mut self) {
        self.events.push(ActuatorEvent::ContinueGame);
    }

    fn enter_setup_mode(&mut self) {
        self.events.push(ActuatorEvent::EnterSetupMode);
    }

    fn exit_setup_mode(&mut self) {
        self.events.push(ActuatorEvent::ExitSetupMode);
    }

    fn show_reset_setup(&mut self) {
        self.events.push(ActuatorEvent::ShowResetSetup);
    }

    fn hide_reset_setup(&mut self) {
        self.events.push(ActuatorEvent::HideResetSetup);
    }
}
