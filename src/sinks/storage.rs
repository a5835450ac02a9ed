//! Persistence sink: best score and the in-progress session.
//!
//! Two backends:
//! - [`MemoryStorage`] keeps the bincode encoding of the session, so every
//!   reload goes through the same validated decode path as real storage.
//! - [`FileStorage`] writes `game_state.json` and `best_score.json` into a
//!   directory.
//!
//! Loaded snapshots are validated against the configured board size; the
//! caller decides what to do with a rejected one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::{SessionSnapshot, StorageError};

/// Persistence contract used by the session controller.
pub trait StorageManager {
    /// The saved session, validated for a board of `expected_size`.
    fn game_state(&self, expected_size: usize) -> Result<Option<SessionSnapshot>, StorageError>;

    fn set_game_state(&mut self, snapshot: &SessionSnapshot) -> Result<(), StorageError>;

    fn clear_game_state(&mut self) -> Result<(), StorageError>;

    /// Best score so far, 0 if none was saved.
    fn best_score(&self) -> Result<u64, StorageError>;

    fn set_best_score(&mut self, score: u64) -> Result<(), StorageError>;
}

/// In-memory storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    game_state: Option<Vec<u8>>,
    best_score: u64,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a saved session.
    pub fn with_game_state(mut self, snapshot: &SessionSnapshot) -> Result<Self, StorageError> {
        self.set_game_state(snapshot)?;
        Ok(self)
    }

    /// Seed raw bytes as the saved session, valid or not.
    #[must_use]
    pub fn with_raw_game_state(mut self, bytes: Vec<u8>) -> Self {
        self.game_state = Some(bytes);
        self
    }

    /// Seed a best score.
    #[must_use]
    pub fn with_best_score(mut self, score: u64) -> Self {
        self.best_score = score;
        self
    }

    /// Is a session currently saved?
    #[must_use]
    pub fn has_game_state(&self) -> bool {
        self.game_state.is_some()
    }
}

impl StorageManager for MemoryStorage {
    fn game_state(&self, expected_size: usize) -> Result<Option<SessionSnapshot>, StorageError> {
        self.game_state
            .as_deref()
            .map(|bytes| SessionSnapshot::from_bytes(bytes, expected_size))
            .transpose()
            .map_err(StorageError::from)
    }

    fn set_game_state(&mut self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        self.game_state = Some(snapshot.to_bytes()?);
        Ok(())
    }

    fn clear_game_state(&mut self) -> Result<(), StorageError> {
        self.game_state = None;
        Ok(())
    }

    fn best_score(&self) -> Result<u64, StorageError> {
        Ok(self.best_score)
    }

    fn set_best_score(&mut self, score: u64) -> Result<(), StorageError> {
        self.best_score = score;
        Ok(())
    }
}

/// JSON files in a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    const GAME_STATE_FILE: &'static str = "game_state.json";
    const BEST_SCORE_FILE: &'static str = "best_score.json";

    /// Use `dir` for storage. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn game_state_path(&self) -> PathBuf {
        self.dir.join(Self::GAME_STATE_FILE)
    }

    fn best_score_path(&self) -> PathBuf {
        self.dir.join(Self::BEST_SCORE_FILE)
    }

    fn read(path: &Path) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        fs::write(path, content).map_err(io_err)
    }
}

impl StorageManager for FileStorage {
    fn game_state(&self, expected_size: usize) -> Result<Option<SessionSnapshot>, StorageError> {
        let Some(json) = Self::read(&self.game_state_path())? else {
            return Ok(None);
        };
        Ok(Some(SessionSnapshot::from_json(&json, expected_size)?))
    }

    fn set_game_state(&mut self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        self.write(&self.game_state_path(), &json)
    }

    fn clear_game_state(&mut self) -> Result<(), StorageError> {
        let path = self.game_state_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn best_score(&self) -> Result<u64, StorageError> {
        match Self::read(&self.best_score_path())? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(0),
        }
    }

    fn set_best_score(&mut self, score: u64) -> Result<(), StorageError> {
        let json = serde_json::to_string(&score)?;
        self.write(&self.best_score_path(), &json)
    }
}
