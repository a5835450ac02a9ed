//! Keyboard, swipe and pointer mapping to intents.
//!
//! `KeyboardInput` turns raw input into [`Intent`]s. It does not know the
//! session's real mode; like a toolbar toggle button it tracks whether it
//! last asked for setup mode, and only maps grid clicks to `CycleTile` while
//! it believes setup is active.
//!
//! ```
//! use tile_merge::core::Direction;
//! use tile_merge::input::{Key, KeyboardInput, Modifiers};
//! use tile_merge::session::Intent;
//!
//! let mut input = KeyboardInput::new(4);
//! assert_eq!(input.key(Key::Char('k'), Modifiers::NONE), Some(Intent::Move(Direction::Up)));
//! assert_eq!(input.swipe(-40.0, 3.0), Some(Intent::Move(Direction::Left)));
//! ```

use crate::core::{Direction, Position};
use crate::session::Intent;

/// Minimum swipe length, in pixels, before a swipe counts as a move.
pub const SWIPE_THRESHOLD: f64 = 10.0;

/// A key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowRight,
    ArrowDown,
    ArrowLeft,
    Char(char),
}

/// Modifier keys held during a key press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        alt: false,
        ctrl: false,
        meta: false,
        shift: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        alt: false,
        ctrl: true,
        meta: false,
        shift: false,
    };

    #[must_use]
    pub fn any(self) -> bool {
        self.alt || self.ctrl || self.meta || self.shift
    }
}

/// Maps input events to intents.
#[derive(Clone, Debug)]
pub struct KeyboardInput {
    size: usize,
    setup_mode: bool,
}

impl KeyboardInput {
    /// Create a mapper for a board of `size`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            setup_mode: false,
        }
    }

    /// Does this input source believe setup mode is active?
    #[must_use]
    pub fn setup_mode(&self) -> bool {
        self.setup_mode
    }

    /// Map a key press.
    ///
    /// Arrows, vim keys and WASD move; `r` restarts; `z` undoes (also with
    /// Ctrl). Remaining bindings cover the toolbar: `p` keep playing, `e`
    /// toggle setup, `g` start game, `x` reset to setup, `c` clear board.
    pub fn key(&mut self, key: Key, modifiers: Modifiers) -> Option<Intent> {
        if let Key::Char('z' | 'Z') = key {
            if modifiers.ctrl || !modifiers.any() {
                return Some(Intent::Undo);
            }
        }
        if modifiers.any() {
            return None;
        }

        if let Some(direction) = Self::direction_for(key) {
            return Some(Intent::Move(direction));
        }

        let Key::Char(c) = key else { return None };
        match c.to_ascii_lowercase() {
            'r' => Some(self.restart()),
            'p' => Some(Intent::KeepPlaying),
            'e' => Some(self.toggle_setup()),
            'g' => Some(self.start_game()),
            'x' => Some(Intent::ResetSetup),
            'c' => Some(Intent::ClearBoard),
            _ => None,
        }
    }

    fn direction_for(key: Key) -> Option<Direction> {
        match key {
            Key::ArrowUp => Some(Direction::Up),
            Key::ArrowRight => Some(Direction::Right),
            Key::ArrowDown => Some(Direction::Down),
            Key::ArrowLeft => Some(Direction::Left),
            Key::Char(c) => match c.to_ascii_lowercase() {
                'k' | 'w' => Some(Direction::Up),
                'l' | 'd' => Some(Direction::Right),
                'j' | 's' => Some(Direction::Down),
                'h' | 'a' => Some(Direction::Left),
                _ => None,
            },
        }
    }

    /// Flip the setup toggle and request the matching transition.
    pub fn toggle_setup(&mut self) -> Intent {
        self.setup_mode = !self.setup_mode;
        if self.setup_mode {
            Intent::EnterSetup
        } else {
            Intent::ExitSetup
        }
    }

    /// Start a new game. A restart always lands in play, so the setup
    /// toggle resets too.
    pub fn restart(&mut self) -> Intent {
        self.setup_mode = false;
        Intent::Restart
    }

    /// Leave setup and start playing the authored board.
    pub fn start_game(&mut self) -> Intent {
        self.setup_mode = false;
        Intent::ExitSetup
    }

    /// Map a completed swipe of `(dx, dy)` pixels.
    #[must_use]
    pub fn swipe(&self, dx: f64, dy: f64) -> Option<Intent> {
        let (abs_dx, abs_dy) = (dx.abs(), dy.abs());
        if abs_dx.max(abs_dy) <= SWIPE_THRESHOLD {
            return None;
        }

        let direction = if abs_dx > abs_dy {
            if dx > 0.0 { Direction::Right } else { Direction::Left }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Some(Intent::Move(direction))
    }

    /// Map a click at `(px, py)`, relative to the grid's top-left corner, on
    /// a grid drawn `width` by `height` pixels.
    #[must_use]
    pub fn click(&self, px: f64, py: f64, width: f64, height: f64) -> Option<Intent> {
        if !self.setup_mode {
            return None;
        }
        self.cell_at(px, py, width, height).map(Intent::CycleTile)
    }

    /// The cell under `(px, py)`, if inside the grid.
    #[must_use]
    pub fn cell_at(&self, px: f64, py: f64, width: f64, height: f64) -> Option<Position> {
        if px < 0.0 || py < 0.0 || px > width || py > height || width <= 0.0 || height <= 0.0 {
            return None;
        }

        let column = (px / (width / self.size as f64)).floor() as usize;
        let row = (py / (height / self.size as f64)).floor() as usize;
        (column < self.size && row < self.size).then(|| Position::new(column, row))
    }
}
