//! Error types.
//!
//! Gameplay itself has no error channel: rejected intents are no-ops. These
//! errors cover the edges of the engine, where data comes from outside
//! (persisted snapshots, configuration, the storage backend).

use std::path::PathBuf;

use super::position::Position;

/// A snapshot that cannot be turned back into a board.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {found} (supported: 1..={supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("board size must be positive")]
    ZeroSize,

    #[error("board size {found} does not match configured size {expected}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("column {column} has {found} cells, expected {expected}")]
    ColumnLength {
        column: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell {slot} records position {found}")]
    MisplacedCell { slot: Position, found: Position },

    #[error("cell {position} holds invalid value {value}")]
    InvalidValue { position: Position, value: u32 },

    #[error("failed to encode or decode snapshot: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored snapshot rejected: {0}")]
    Snapshot(#[from] SnapshotError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_error_display() {
        let err = SnapshotError::ColumnLength {
            column: 2,
            expected: 4,
            found: 3,
        };
        assert_eq!(err.to_string(), "column 2 has 3 cells, expected 4");

        let err = SnapshotError::InvalidValue {
            position: Position::new(1, 0),
            value: 6,
        };
        assert_eq!(err.to_string(), "cell (1, 0) holds invalid value 6");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("size must be > 0".to_string());
        assert_eq!(err.to_string(), "config validation error: size must be > 0");
    }

    #[test]
    fn test_storage_error_wraps_snapshot() {
        let err: StorageError = SnapshotError::ZeroSize.into();
        assert_eq!(err.to_string(), "stored snapshot rejected: board size must be positive");
    }
}
