#![deny(warnings)]

//! Persistence layer: a small key/value store abstraction and best-effort
//! save/load of the pet record.
//!
//! Loading never fails. A missing record yields a fresh pet; an unreadable,
//! unparsable or invalid one is logged and replaced by a fresh pet. Saving
//! reports failure as `false` after logging it, so the simulation can keep
//! running in memory.

use pet_core::{validate_state, PetState, ValidationError};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use pet_core::DEFAULT_STORAGE_KEY;

/// Errors raised by a [`Store`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Why a stored record could not be turned into a pet.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed record: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("record violates invariants: {0}")]
    Invalid(#[from] ValidationError),
}

/// String key/value storage, read and written whole.
pub trait Store {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir`, creating it if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Store for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a sibling temp file first and renames it into place, so a
    /// crash mid-write leaves the previous record intact.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// A store whose reads and writes all fail.
    pub fn unavailable() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Toggle write failures at runtime, e.g. a full disk that later frees up.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Where a loaded pet came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Nothing stored yet.
    Fresh,
    Restored,
    /// A record existed but could not be used; defaults were substituted.
    Recovered,
}

/// Parse and validate a stored record.
pub fn decode_state(raw: &str) -> Result<PetState, DecodeError> {
    let state: PetState = serde_json::from_str(raw)?;
    validate_state(&state)?;
    Ok(state)
}

pub fn encode_state(state: &PetState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Load the pet stored under `key`, falling back to a fresh pet.
pub fn load_state<S: Store + ?Sized>(store: &S, key: &str) -> (PetState, LoadSource) {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no saved pet, starting fresh");
            return (PetState::default(), LoadSource::Fresh);
        }
        Err(e) => {
            warn!(key, error = %e, "failed to read saved pet, starting fresh");
            return (PetState::default(), LoadSource::Recovered);
        }
    };
    match decode_state(&raw) {
        Ok(state) => {
            info!(key, name = state.name.as_str(), level = state.level, "pet restored");
            (state, LoadSource::Restored)
        }
        Err(e) => {
            warn!(key, error = %e, "saved pet is corrupt, starting fresh");
            (PetState::default(), LoadSource::Recovered)
        }
    }
}

/// Serialize and write the pet. Failures are logged and reported as `false`.
pub fn save_state<S: Store + ?Sized>(store: &mut S, key: &str, state: &PetState) -> bool {
    let encoded = match encode_state(state) {
        Ok(s) => s,
        Err(e) => {
            warn!(key, error = %e, "failed to encode pet");
            return false;
        }
    };
    match store.write(key, &encoded) {
        Ok(()) => {
            debug!(key, bytes = encoded.len(), "pet saved");
            true
        }
        Err(e) => {
            warn!(key, error = %e, "failed to save pet");
            false
        }
    }
}
