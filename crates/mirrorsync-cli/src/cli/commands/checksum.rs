//! `mirrorsync checksum` – MD5 of a local file.

use anyhow::Result;
use mirrorsync_core::checksum;
use std::path::Path;

/// Compute and print MD5 of the given file, `md5sum` style.
pub fn run_checksum(path: &Path) -> Result<()> {
    let digest = checksum::md5_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
