//! MD5 integrity checks.
//!
//! Detail pages publish an MD5 digest for the item. Downloaded bodies are
//! verified in memory before anything touches the disk; `md5_path` exists for
//! checking files after the fact.

use anyhow::{Context, Result};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Reference digest published for an item, normalised to lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceHash(String);

impl ReferenceHash {
    /// Accepts a 32-character hex string in any case. Returns `None` for
    /// anything else (including an empty string).
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() != 32 || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against the digest of `bytes`.
    pub fn verify(&self, bytes: &[u8]) -> Result<(), DigestMismatch> {
        let computed = md5_hex(bytes);
        if computed.eq_ignore_ascii_case(&self.0) {
            Ok(())
        } else {
            Err(DigestMismatch {
                computed,
                expected: self.0.clone(),
            })
        }
    }
}

impl fmt::Display for ReferenceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body digest did not match the published reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestMismatch {
    pub computed: String,
    pub expected: String,
}

/// MD5 of `bytes` as lowercase hex.
pub fn md5_hex(bytes: &[u8]) -> String {
    hex::encode(md5::compute(bytes).0)
}

/// MD5 of a file, read in chunks.
pub fn md5_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut ctx = md5::Context::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        ctx.consume(&buf[..n]);
    }
    Ok(hex::encode(ctx.compute().0))
}
