use std::{
    fs,
    io::Write,
    path::PathBuf,
    sync::{Arc, RwLock},
};

use common::api::{MaintenancePresentation, SiteStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Committed local state the gate decides on.
///
/// `presentation` is `Some` iff the status is maintenance; the transition back
/// to active erases it in the same store() call so no stale copy can be
/// served.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteState {
    pub status: SiteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<MaintenancePresentation>,
}

impl Default for SiteState {
    fn default() -> Self {
        Self {
            status: SiteStatus::Active,
            presentation: None,
        }
    }
}

impl SiteState {
    pub fn maintenance(presentation: MaintenancePresentation) -> Self {
        Self {
            status: SiteStatus::Maintenance,
            presentation: Some(presentation),
        }
    }

    pub fn active() -> Self {
        Self::default()
    }
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to access state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Load/store capability the receiver and the gate share.
///
/// A `store` must be atomic with respect to concurrent `load`s: a reader
/// observes either the fully-old or the fully-new state, never a mix of
/// status and presentation fields.
pub trait StatusStore: Send + Sync {
    fn load(&self) -> Result<SiteState, StateError>;
    fn store(&self, state: &SiteState) -> Result<(), StateError>;
}

pub type DynStatusStore = Arc<dyn StatusStore>;

/// JSON-file-backed store. Writes go to a sibling temp file and are renamed
/// into place; an in-process RwLock keeps load/store atomic for the gate.
pub struct FileStatusStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileStatusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "site-state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StatusStore for FileStatusStore {
    fn load(&self) -> Result<SiteState, StateError> {
        let _guard = self.lock.read().expect("state lock poisoned");
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            // Never-written state defaults to active.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(SiteState::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn store(&self, state: &SiteState) -> Result<(), StateError> {
        let _guard = self.lock.write().expect("state lock poisoned");
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.tmp_path();
        let bytes = serde_json::to_vec_pretty(state)?;
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemoryStatusStore {
    state: RwLock<SiteState>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SiteState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

impl StatusStore for MemoryStatusStore {
    fn load(&self) -> Result<SiteState, StateError> {
        Ok(self.state.read().expect("state lock poisoned").clone())
    }

    fn store(&self, state: &SiteState) -> Result<(), StateError> {
        *self.state.write().expect("state lock poisoned") = state.clone();
        Ok(())
    }
}
