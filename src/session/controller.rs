//! Session controller: moves, scoring, win/loss, undo, and setup mode.
//!
//! The controller exclusively owns the board and all session state. Each
//! intent is handled synchronously and runs to completion; after every
//! state change the controller renders through its [`Actuator`] and
//! persists through its [`StorageManager`].
//!
//! ## Move resolution
//!
//! 1. Snapshot the session onto the undo history.
//! 2. Save every unit's position and clear last move's merge provenance.
//! 3. Visit cells farthest-first in the move direction. Each unit slides to
//!    the farthest empty cell, or merges into the blocking unit when the
//!    values match and the blocker was not itself produced by a merge this
//!    move. Merges therefore never chain.
//! 4. If nothing moved, drop the snapshot and stop. Otherwise spawn a tile,
//!    check for game over, and render.
//!
//! ## Modes
//!
//! `Playing` accepts moves, undo and reset-to-setup. `Setup` accepts board
//! edits (clear, cycle a cell). Restart and keep-playing work in either.
//!
//! ```
//! use tile_merge::core::{Direction, GameConfig};
//! use tile_merge::session::{IntentHandler, SessionController};
//! use tile_merge::sinks::{MemoryStorage, RecordingActuator};
//!
//! let config = GameConfig::default().with_seed(7);
//! let mut session = SessionController::new(config, RecordingActuator::new(), MemoryStorage::new()).unwrap();
//! assert_eq!(session.board().occupied_count(), 2);
//!
//! for direction in Direction::ALL {
//!     session.move_tiles(direction);
//! }
//! assert!(session.history().len() <= 10);
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::history::History;
use super::intent::IntentHandler;
use crate::core::{
    Board, BoardSnapshot, ConfigError, Direction, GameConfig, GameRng, Position, SessionSnapshot,
    SnapshotError, Traversals, Unit, UnitId, MAX_TILE_VALUE, SNAPSHOT_VERSION,
};
use crate::sinks::{Actuator, Frame, RenderMetadata, StorageManager};

/// Which intents the session accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Playing,
    Setup,
}

/// Orchestrates one game session.
pub struct SessionController<A: Actuator, S: StorageManager> {
    config: GameConfig,
    rng: GameRng,
    board: Board,
    score: u64,
    over: bool,
    won: bool,
    keep_playing: bool,
    mode: Mode,
    history: History,
    /// Board captured when setup mode was last exited.
    setup_state: Option<BoardSnapshot>,
    /// Units merged away during the last move, for resolving provenance.
    retired: FxHashMap<UnitId, Unit>,
    actuator: A,
    storage: S,
}

impl<A: Actuator, S: StorageManager> SessionController<A, S> {
    /// Create a session, resuming a saved game from `storage` if it holds a
    /// valid one, and render it.
    pub fn new(config: GameConfig, actuator: A, storage: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };

        let mut session = Self {
            rng,
            board: Board::new(config.size),
            score: 0,
            over: false,
            won: false,
            keep_playing: false,
            mode: Mode::Playing,
            history: History::new(config.history_depth),
            setup_state: None,
            retired: FxHashMap::default(),
            actuator,
            storage,
            config,
        };
        session.setup();
        Ok(session)
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.over
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.won
    }

    #[must_use]
    pub fn is_keep_playing(&self) -> bool {
        self.keep_playing
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn is_setup_mode(&self) -> bool {
        self.mode == Mode::Setup
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Board saved by the last `exit_setup`, if any.
    #[must_use]
    pub fn setup_baseline(&self) -> Option<&BoardSnapshot> {
        self.setup_state.as_ref()
    }

    #[must_use]
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Lost, or won without choosing to keep playing.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.over || (self.won && !self.keep_playing)
    }

    /// Is there an empty cell or a pair of equal orthogonal neighbours?
    #[must_use]
    pub fn moves_available(&self) -> bool {
        self.board.cells_available() || self.board.tile_matches_available()
    }

    /// The full session in persistable form.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            grid: self.board.snapshot(),
            score: self.score,
            over: self.over,
            won: self.won,
            keep_playing: self.keep_playing,
        }
    }

    // === Lifecycle ===

    /// Resume the saved game, or start fresh, then render.
    fn setup(&mut self) {
        match self.storage.game_state(self.config.size) {
            Ok(Some(previous)) => match self.restore_session(&previous) {
                Ok(()) => info!(score = self.score, "resumed saved game"),
                Err(err) => {
                    warn!(error = %err, "saved game rejected, starting fresh");
                    self.start_fresh();
                }
            },
            Ok(None) => self.start_fresh(),
            Err(err) => {
                warn!(error = %err, "saved game unreadable, starting fresh");
                self.start_fresh();
            }
        }

        self.actuate();
    }

    fn start_fresh(&mut self) {
        self.board = Board::new(self.config.size);
        self.retired.clear();
        self.reset_flags();

        for _ in 0..self.config.start_tiles {
            self.add_random_tile();
        }
        info!(size = self.config.size, tiles = self.config.start_tiles, "started fresh game");
    }

    /// Replace board, score and flags with `snapshot`.
    fn restore_session(&mut self, snapshot: &SessionSnapshot) -> Result<(), SnapshotError> {
        self.board = Board::from_snapshot(&snapshot.grid)?;
        self.retired.clear();
        self.score = snapshot.score;
        self.over = snapshot.over;
        self.won = snapshot.won;
        self.keep_playing = snapshot.keep_playing;
        Ok(())
    }

    fn reset_flags(&mut self) {
        self.score = 0;
        self.over = false;
        self.won = false;
        self.keep_playing = false;
    }

    /// Place a 2 (or, with the configured odds, a 4) on a random empty cell.
    fn add_random_tile(&mut self) {
        if !self.board.cells_available() {
            return;
        }
        let Some(position) = self.board.random_available_cell(&mut self.rng) else {
            return;
        };
        let value = self.rng.spawn_value(self.config.spawn_four_probability);
        let id = self.board.alloc_id();
        self.board.insert_tile(Unit::new(id, position, value));
        debug!(%position, value, "spawned tile");
    }

    /// Update best score, persist, and render.
    fn actuate(&mut self) {
        let mut best_score = self.storage.best_score().unwrap_or_else(|err| {
            warn!(error = %err, "failed to read best score");
            0
        });
        if best_score < self.score {
            best_score = self.score;
            if let Err(err) = self.storage.set_best_score(best_score) {
                warn!(error = %err, "failed to save best score");
            }
        }

        let persisted = if self.over {
            self.storage.clear_game_state()
        } else {
            let snapshot = self.snapshot();
            self.storage.set_game_state(&snapshot)
        };
        if let Err(err) = persisted {
            warn!(error = %err, "failed to persist game state");
        }

        let metadata = RenderMetadata {
            score: self.score,
            over: self.over,
            won: self.won,
            best_score,
            terminated: self.is_terminated(),
        };
        let frame = Frame::capture(&self.board, &self.retired);
        self.actuator.actuate(&frame, &metadata);
    }

    // === Moves ===

    /// Save positions and clear provenance on every live unit.
    fn prepare_tiles(&mut self) {
        self.retired.clear();
        self.board.each_unit_mut(|unit| {
            unit.clear_provenance();
            unit.save_position();
        });
    }

    /// Merge the unit at `from` into the equal unit at `to`.
    fn merge_tiles(&mut self, from: Position, to: Position) {
        let mut source = self.board.remove_tile(from);
        let target = self.board.remove_tile(to);
        let Some(value) = source.value.checked_mul(2) else {
            panic!("merging {} at {to} overflows the tile value", source.value);
        };

        let id = self.board.alloc_id();
        self.board.insert_tile(Unit::merged(id, to, value, (source.id, target.id)));

        // The source is gone from the board; its position only feeds rendering.
        source.update_position(to);

        self.score += u64::from(value);
        debug!(%from, %to, value, score = self.score, "merged tiles");

        if value == self.config.win_value {
            self.won = true;
            info!(value, score = self.score, "winning tile created");
        }

        self.retired.insert(source.id, source);
        self.retired.insert(target.id, target);
    }

    // === Undo ===

    fn restore_from_history(&mut self, snapshot: &SessionSnapshot) {
        if let Err(err) = self.restore_session(snapshot) {
            panic!("undo history held an invalid snapshot: {err}");
        }
    }
}

impl<A: Actuator, S: StorageManager> IntentHandler for SessionController<A, S> {
    fn move_tiles(&mut self, direction: Direction) -> bool {
        if self.mode == Mode::Setup {
            debug!(%direction, "move ignored in setup mode");
            return false;
        }
        if self.is_terminated() {
            debug!(%direction, "move ignored, game terminated");
            return false;
        }

        let traversals = Traversals::new(self.board.size(), direction);
        let snapshot = self.snapshot();
        self.history.push(snapshot);
        self.prepare_tiles();

        let mut moved = false;
        for cell in traversals.positions() {
            let Some(value) = self.board.cell_content(cell).map(|unit| unit.value) else {
                continue;
            };

            let positions = self.board.find_farthest_position(cell, direction);
            // Tiles at the value ceiling only slide.
            let merge_target = positions.next.filter(|&next| {
                value < MAX_TILE_VALUE
                    && self
                        .board
                        .cell_content(next)
                        .is_some_and(|other| other.value == value && !other.is_merged())
            });

            match merge_target {
                Some(next) => {
                    self.merge_tiles(cell, next);
                    moved = true;
                }
                None => {
                    self.board.move_tile(cell, positions.farthest);
                    moved |= positions.farthest != cell;
                }
            }
        }

        if !moved {
            self.history.pop();
            debug!(%direction, "move changed nothing");
            return false;
        }

        self.add_random_tile();

        if !self.moves_available() {
            self.over = true;
            info!(score = self.score, "game over");
        }

        debug!(%direction, score = self.score, "move applied");
        self.actuate();
        true
    }

    fn restart(&mut self) -> bool {
        if let Err(err) = self.storage.clear_game_state() {
            warn!(error = %err, "failed to clear saved game");
        }
        self.actuator.continue_game();
        self.history.clear();
        self.setup_state = None;
        self.actuator.hide_reset_setup();

        if self.mode == Mode::Setup {
            self.mode = Mode::Playing;
            self.actuator.exit_setup_mode();
        }

        info!("restarting");
        self.start_fresh();
        self.actuate();
        true
    }

    fn keep_playing(&mut self) -> bool {
        if !self.won || self.keep_playing {
            debug!("keep playing ignored, game not in won state");
            return false;
        }

        self.keep_playing = true;
        self.actuator.continue_game();
        info!(score = self.score, "continuing past winning tile");
        self.actuate();
        true
    }

    fn undo(&mut self) -> bool {
        if self.mode == Mode::Setup {
            debug!("undo ignored in setup mode");
            return false;
        }
        let Some(previous) = self.history.pop() else {
            debug!("undo ignored, history empty");
            return false;
        };

        self.restore_from_history(&previous);
        debug!(score = self.score, remaining = self.history.len(), "undid move");
        self.actuate();
        true
    }

    fn enter_setup(&mut self) -> bool {
        if self.mode == Mode::Setup {
            return false;
        }

        self.mode = Mode::Setup;
        self.actuator.enter_setup_mode();
        info!("entered setup mode");
        true
    }

    fn exit_setup(&mut self) -> bool {
        if self.mode == Mode::Playing {
            return false;
        }

        self.mode = Mode::Playing;
        self.reset_flags();
        self.history.clear();
        self.setup_state = Some(self.board.snapshot());

        self.actuator.exit_setup_mode();
        self.actuator.show_reset_setup();
        info!(tiles = self.board.occupied_count(), "exited setup mode");
        self.actuate();
        true
    }

    fn reset_to_setup(&mut self) -> bool {
        if self.mode == Mode::Setup {
            debug!("reset to setup ignored in setup mode");
            return false;
        }
        let Some(baseline) = self.setup_state.as_ref() else {
            debug!("reset to setup ignored, no baseline saved");
            return false;
        };

        let board = match Board::from_snapshot(baseline) {
            Ok(board) => board,
            Err(err) => panic!("setup baseline is invalid: {err}"),
        };
        self.board = board;
        self.retired.clear();
        self.reset_flags();
        self.history.clear();

        info!("reset to setup baseline");
        self.actuate();
        true
    }

    fn clear_board(&mut self) -> bool {
        if self.mode == Mode::Playing {
            debug!("clear board ignored outside setup mode");
            return false;
        }

        self.board = Board::new(self.config.size);
        self.retired.clear();
        self.actuate();
        true
    }

    fn cycle_tile(&mut self, position: Position) -> bool {
        if self.mode == Mode::Playing {
            debug!(%position, "cycle tile ignored outside setup mode");
            return false;
        }
        if !self.board.within_bounds(position) {
            debug!(%position, "cycle tile ignored, out of bounds");
            return false;
        }

        let current = self.board.cell_content(position).map(|unit| unit.value);
        let next = match current {
            None => Some(2),
            Some(value) if value >= self.config.max_setup_value => None,
            Some(value) => Some(value * 2),
        };

        if current.is_some() {
            self.board.remove_tile(position);
        }
        if let Some(value) = next {
            let id = self.board.alloc_id();
            self.board.insert_tile(Unit::new(id, position, value));
        }

        debug!(%position, ?next, "cycled tile");
        self.actuate();
        true
    }
}
