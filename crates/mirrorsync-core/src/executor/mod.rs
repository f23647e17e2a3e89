//! Per-item download: detail page, ranked mirrors, integrity gate, disk write.
//!
//! ```text
//! FetchPage ──err──▶ PageUnavailable
//!     │
//!     ▼
//! rank mirrors ─▶ TryMirror(i) ──ok──▶ save ─▶ Success
//!                     │ fail
//!                     ▼
//!               more mirrors? ──no──▶ AllMirrorsFailed
//! ```
//!
//! Every per-item problem ends in an outcome; the only error that escapes
//! [`ItemExecutor::execute`] is a failure to write downloaded content.

mod artifact;
mod attempt;

pub use artifact::{failure_log_path, write_content, write_failure_log};
pub use attempt::MirrorFailure;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SyncConfig;
use crate::fetch::{get_text, HttpFetcher};
use crate::host_stats::HostLoadTracker;
use crate::item::{DownloadOutcome, ItemId};
use crate::mirror::rank_mirrors;
use crate::progress::Reporter;
use crate::scheduler::ProcessItem;
use crate::sources::DetailParser;
use crate::url_model::derive_filename;

/// Outcome of one item plus the diagnostics collected along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub outcome: DownloadOutcome,
    /// One line per failed step (page fetch or mirror attempt).
    pub failures: Vec<String>,
}

/// Shared by all item workers.
pub struct ItemExecutor {
    fetcher: Arc<dyn HttpFetcher>,
    parser: Arc<dyn DetailParser>,
    tracker: Arc<HostLoadTracker>,
    config: SyncConfig,
    output_dir: PathBuf,
    rng: Mutex<StdRng>,
    reporter: Reporter,
}

impl ItemExecutor {
    pub fn new(
        fetcher: Arc<dyn HttpFetcher>,
        parser: Arc<dyn DetailParser>,
        tracker: Arc<HostLoadTracker>,
        config: SyncConfig,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            parser,
            tracker,
            config,
            output_dir: output_dir.into(),
            rng: Mutex::new(StdRng::seed_from_u64(rand::random())),
            reporter: Reporter::silent(),
        }
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Fix the shuffle seed used before ranking mirrors.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn execute(&self, id: ItemId) -> Result<ItemReport> {
        let page_url = self.config.item_page_url(id);
        let report = match get_text(self.fetcher.as_ref(), &page_url) {
            Err(e) => {
                self.reporter.item(id, format!("page unavailable: {e}"));
                ItemReport {
                    outcome: DownloadOutcome::PageUnavailable,
                    failures: vec![format!("{page_url}: {e}")],
                }
            }
            Ok(html) => self.download(id, &page_url, &html)?,
        };

        if !report.outcome.is_success() {
            if let Err(e) = write_failure_log(&self.output_dir, id, &report.failures) {
                tracing::warn!(item = %id, "could not write failure log: {e:#}");
            }
        }
        Ok(report)
    }

    fn download(&self, id: ItemId, page_url: &str, html: &str) -> Result<ItemReport> {
        let page = self.parser.parse(page_url, html);
        if page.reference_hash.is_none() {
            self.reporter
                .item(id, "no MD5 checksum on page; downloads will not be verified");
        }
        if page.mirrors.is_empty() {
            self.reporter.item(id, "no mirrors listed");
            return Ok(ItemReport {
                outcome: DownloadOutcome::AllMirrorsFailed,
                failures: vec![format!("{page_url}: no mirrors listed")],
            });
        }

        let found = format!(
            "{} mirrors found on {page_url} ({})",
            page.mirrors.len(),
            page.mirrors
                .iter()
                .map(|m| m.host())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let ranked = {
            let snapshot = self.tracker.snapshot();
            let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
            rank_mirrors(page.mirrors, &snapshot, &mut *rng)
        };

        let mut failures = Vec::new();
        for mirror in &ranked {
            tracing::debug!(item = %id, mirror = %mirror, "trying mirror");
            match attempt::try_mirror(
                self.fetcher.as_ref(),
                &self.tracker,
                mirror,
                page.reference_hash.as_ref(),
            ) {
                Ok(body) => {
                    let filename = derive_filename(mirror.url(), &format!("item-{id}.bin"));
                    write_content(&self.output_dir, &filename, &body)?;
                    self.reporter.item(id, format!("OK: {mirror}"));
                    return Ok(ItemReport {
                        outcome: DownloadOutcome::Success { filename },
                        failures,
                    });
                }
                Err(failure) => {
                    self.reporter
                        .item(id, format!("Skipping mirror {mirror}: {failure}"));
                    failures.push(format!("{mirror}: {failure}"));
                }
            }
        }

        self.reporter.item(id, "all mirrors failed");
        failures.insert(0, found);
        Ok(ItemReport {
            outcome: DownloadOutcome::AllMirrorsFailed,
            failures,
        })
    }
}

impl ProcessItem for ItemExecutor {
    fn process(&self, id: ItemId) -> Result<DownloadOutcome> {
        self.execute(id).map(|r| r.outcome)
    }
}

#[cfg(test)]
mod tests;
