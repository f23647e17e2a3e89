//! Read/write the run state file (JSON, default under the XDG state dir).

use std::path::{Path, PathBuf};

use super::RunState;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("read state {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse state {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("write state {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Default path for the state file: `~/.local/state/mirrorsync/state.json`.
pub fn default_state_path() -> anyhow::Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mirrorsync")?;
    Ok(xdg_dirs
        .get_state_home()
        .join("mirrorsync")
        .join("state.json"))
}

/// Location of the persisted [`RunState`].
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state. A missing file is the default state, not an error.
    pub fn load(&self) -> Result<RunState, StateError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RunState::default()),
            Err(source) => {
                return Err(StateError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RunState::default());
        }
        serde_json::from_slice(&bytes).map_err(|source| StateError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the file with `state` (creates the parent dir if needed).
    pub fn save(&self, state: &RunState) -> Result<(), StateError> {
        let write_err = |source| StateError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(state).map_err(|e| write_err(e.into()))?;
        std::fs::write(&self.path, json).map_err(write_err)
    }
}

/// Load the state or fall back to the default, warning on failure. The run
/// proceeds without the stored cursors rather than aborting.
pub fn load_or_default(store: &StateStore) -> RunState {
    match store.load() {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!("{e}; continuing with empty state");
            RunState::default()
        }
    }
}
