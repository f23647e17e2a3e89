//! CLI command handlers, one per file.

mod checksum;
mod run;
mod status;

pub use checksum::run_checksum;
pub use run::{run_sync, RunArgs};
pub use status::run_status;

use std::path::{Path, PathBuf};

use anyhow::Result;
use mirrorsync_core::state::default_state_path;

/// `--state` if given, else the XDG default.
fn state_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_state_path(),
    }
}
