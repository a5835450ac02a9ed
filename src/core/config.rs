//! Engine configuration.
//!
//! Everything the rules treat as a constant lives here so tests and front
//! ends can vary it: board size, number of start tiles, the winning value,
//! undo depth, spawn odds, the authoring-mode ceiling and the RNG seed.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Largest supported board edge.
pub const MAX_BOARD_SIZE: usize = 16;

/// Largest tile value a board may hold. Two tiles of this value never merge,
/// so a merged value always fits in `u32`.
pub const MAX_TILE_VALUE: u32 = 1 << 30;

/// Engine configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board edge length N (the board has N×N cells).
    pub size: usize,

    /// Random tiles placed when a fresh game starts.
    pub start_tiles: usize,

    /// Creating a tile of this value wins the game.
    pub win_value: u32,

    /// Number of undo snapshots kept; older ones are evicted.
    pub history_depth: usize,

    /// Chance that a spawned tile is a 4 instead of a 2.
    pub spawn_four_probability: f64,

    /// Highest value reachable by cycling a cell in setup mode; cycling
    /// past it empties the cell.
    pub max_setup_value: u32,

    /// Seed for tile spawns. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 4,
            start_tiles: 2,
            win_value: 2048,
            history_depth: 10,
            spawn_four_probability: 0.1,
            max_setup_value: 32768,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Set the board size.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the number of start tiles.
    #[must_use]
    pub fn with_start_tiles(mut self, count: usize) -> Self {
        self.start_tiles = count;
        self
    }

    /// Set the winning tile value.
    #[must_use]
    pub fn with_win_value(mut self, value: u32) -> Self {
        self.win_value = value;
        self
    }

    /// Set the undo depth.
    #[must_use]
    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    /// Set the probability of spawning a 4.
    #[must_use]
    pub fn with_spawn_four_probability(mut self, probability: f64) -> Self {
        self.spawn_four_probability = probability;
        self
    }

    /// Seed tile spawns for reproducible games.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 || self.size > MAX_BOARD_SIZE {
            return Err(ConfigError::Validation(format!(
                "size must be in 1..={MAX_BOARD_SIZE}, got {}",
                self.size
            )));
        }
        if self.start_tiles > self.size * self.size {
            return Err(ConfigError::Validation(format!(
                "start_tiles ({}) exceeds the {} cells of the board",
                self.start_tiles,
                self.size * self.size
            )));
        }
        if self.history_depth == 0 {
            return Err(ConfigError::Validation("history_depth must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.spawn_four_probability) {
            return Err(ConfigError::Validation(
                "spawn_four_probability must be in [0, 1]".into(),
            ));
        }
        if !is_tile_value(self.win_value) || self.win_value < 4 {
            return Err(ConfigError::Validation(
                "win_value must be a power of two >= 4".into(),
            ));
        }
        if !is_tile_value(self.max_setup_value) || self.max_setup_value < 4 {
            return Err(ConfigError::Validation(
                "max_setup_value must be a power of two >= 4".into(),
            ));
        }
        Ok(())
    }
}

/// Tile values are powers of two, starting at 2.
#[must_use]
pub const fn is_tile_value(value: u32) -> bool {
    value >= 2 && value <= MAX_TILE_VALUE && value.is_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.size, 4);
        assert_eq!(config.start_tiles, 2);
        assert_eq!(config.win_value, 2048);
        assert_eq!(config.history_depth, 10);
        assert_eq!(config.max_setup_value, 32768);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::default()
            .with_size(5)
            .with_start_tiles(3)
            .with_win_value(64)
            .with_history_depth(3)
            .with_spawn_four_probability(0.0)
            .with_seed(123);

        assert_eq!(config.size, 5);
        assert_eq!(config.start_tiles, 3);
        assert_eq!(config.win_value, 64);
        assert_eq!(config.history_depth, 3);
        assert_eq!(config.spawn_four_probability, 0.0);
        assert_eq!(config.seed, Some(123));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        assert!(GameConfig::default().with_size(0).validate().is_err());
        assert!(GameConfig::default().with_size(17).validate().is_err());
        assert!(GameConfig::default().with_size(2).with_start_tiles(5).validate().is_err());
        assert!(GameConfig::default().with_history_depth(0).validate().is_err());
        assert!(GameConfig::default().with_spawn_four_probability(1.5).validate().is_err());
        assert!(GameConfig::default().with_win_value(100).validate().is_err());
        assert!(GameConfig::default().with_win_value(2).validate().is_err());
    }

    #[test]
    fn test_is_tile_value() {
        assert!(is_tile_value(2));
        assert!(is_tile_value(32768));
        assert!(!is_tile_value(0));
        assert!(!is_tile_value(1));
        assert!(!is_tile_value(12));
        assert!(is_tile_value(MAX_TILE_VALUE));
        assert!(!is_tile_value(1 << 31));
    }

    #[test]
    fn test_serialization() {
        let config = GameConfig::default().with_seed(9);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"size": 5}"#).unwrap();
        assert_eq!(config.size, 5);
        assert_eq!(config.win_value, 2048);
    }
}
