//! `mirrorsync run` – one incremental pass over items and, optionally, the listing.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use mirrorsync_core::config::SyncConfig;
use mirrorsync_core::coordinator::{RunCoordinator, RunPlan};
use mirrorsync_core::executor::ItemExecutor;
use mirrorsync_core::fetch::{CurlFetcher, HttpFetcher};
use mirrorsync_core::host_stats::HostLoadTracker;
use mirrorsync_core::item::ItemId;
use mirrorsync_core::listing::ListingSync;
use mirrorsync_core::progress::{ProgressEvent, Reporter};
use mirrorsync_core::sources::{HtmlDetailParser, HtmlListingParser, RssLatestItem};
use mirrorsync_core::state::{load_or_default, StateStore};

use crate::cli::prompt;

/// Flags of `mirrorsync run` after parsing.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub output: Option<PathBuf>,
    pub state: Option<PathBuf>,
    pub from: Option<ItemId>,
    pub to: Option<ItemId>,
    pub include_listing: bool,
    pub listing_since: Option<NaiveDateTime>,
}

pub async fn run_sync(cfg: &SyncConfig, args: RunArgs) -> Result<()> {
    let output_dir = match args.output {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if !output_dir.is_dir() {
        bail!("output directory {} does not exist", output_dir.display());
    }

    let store = StateStore::new(super::state_path(args.state.as_deref())?);
    let prev = load_or_default(&store);

    let mut plan = RunPlan {
        from: args.from,
        to: args.to,
        include_listing: args.include_listing,
        listing_since: args.listing_since,
    };
    {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stdout();
        if plan.from.is_none() && prev.next_item_id.is_none() {
            plan.from = Some(prompt::ask_start_item(&mut input, &mut out)?);
        }
        if plan.include_listing && plan.listing_since.is_none() && prev.sync_cursor.is_none() {
            plan.listing_since = prompt::ask_listing_since(&mut input, &mut out)?;
        }
    }

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel::<ProgressEvent>();
    let printer = tokio::spawn(async move {
        while let Some(event) = progress_rx.recv().await {
            println!("{event}");
        }
    });
    let reporter = Reporter::new(progress_tx);

    let fetcher: Arc<dyn HttpFetcher> = Arc::new(CurlFetcher::new(&cfg.http, &cfg.user_agent));
    let executor = ItemExecutor::new(
        Arc::clone(&fetcher),
        Arc::new(HtmlDetailParser),
        Arc::new(HostLoadTracker::new()),
        cfg.clone(),
        &output_dir,
    )
    .with_reporter(reporter.clone());
    let listing = ListingSync::new(
        Arc::clone(&fetcher),
        Arc::new(HtmlListingParser),
        cfg.listing_url.clone(),
        cfg.listing_base_url.clone(),
        &output_dir,
        cfg.threads,
    )
    .with_reporter(reporter.clone());
    let coordinator = RunCoordinator::new(
        Arc::new(RssLatestItem::new(Arc::clone(&fetcher), cfg.feed_url.clone())),
        Arc::new(executor),
        Arc::new(listing),
        cfg.threads,
    )
    .with_reporter(reporter);

    let result = coordinator.run(&prev, &plan).await;
    // Closing every sender lets the printer drain and finish.
    drop(coordinator);
    let _ = printer.await;
    let report = result.context("run aborted")?;

    if let Err(e) = store.save(&report.state) {
        tracing::warn!("{e}");
        eprintln!("warning: {e}");
    }
    if let Some(items) = &report.items {
        tracing::info!(
            processed = items.processed,
            succeeded = items.succeeded,
            failed = items.failed,
            "item run finished"
        );
    }
    match report.state.next_item_id {
        Some(id) => println!("Next run starts at item {id}."),
        None => println!("No item position stored."),
    }
    Ok(())
}
