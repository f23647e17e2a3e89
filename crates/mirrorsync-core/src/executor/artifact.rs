//! Files the executor leaves in the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::item::ItemId;

/// Write downloaded content to `<dir>/<filename>`, replacing any existing file.
pub fn write_content(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(filename);
    fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// Path of the diagnostic file for an item that could not be downloaded.
pub fn failure_log_path(dir: &Path, id: ItemId) -> PathBuf {
    dir.join(format!("{id}_failure.log"))
}

/// Write `<dir>/<id>_failure.log` with one diagnostic per line.
pub fn write_failure_log(dir: &Path, id: ItemId, lines: &[String]) -> Result<PathBuf> {
    let path = failure_log_path(dir, id);
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
