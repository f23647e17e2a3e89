//! CLI for mirrorsync.

mod commands;
mod prompt;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use mirrorsync_core::config;
use mirrorsync_core::item::ItemId;
use mirrorsync_core::sources::parse_timestamp;

use commands::{run_checksum, run_status, run_sync, RunArgs};

/// Top-level CLI for mirrorsync.
#[derive(Debug, Parser)]
#[command(name = "mirrorsync")]
#[command(about = "mirrorsync: incremental multi-mirror downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download new items (and optionally new listing bundles) since the last run.
    Run {
        /// Directory to save into; must exist (default: current directory).
        #[arg(long, short, value_name = "DIR")]
        output: Option<PathBuf>,
        /// State file (default: ~/.local/state/mirrorsync/state.json).
        #[arg(long, value_name = "FILE")]
        state: Option<PathBuf>,
        /// First item to fetch; overrides the stored position.
        #[arg(long, value_name = "ID")]
        from: Option<ItemId>,
        /// Last item to fetch, if below the newest published item.
        #[arg(long, value_name = "ID")]
        to: Option<ItemId>,
        /// Worker threads (overrides the config file).
        #[arg(long, short = 'j', value_name = "N", value_parser = parse_threads)]
        threads: Option<usize>,
        /// Also sync the archive listing.
        #[arg(long)]
        include_listing: bool,
        /// Only fetch listing entries added on or after this date (YYYY-MM-DD[ HH:MM[:SS]]).
        /// Implies --include-listing.
        #[arg(long, value_name = "DATE", value_parser = parse_since)]
        listing_since: Option<NaiveDateTime>,
    },

    /// Show the stored item and listing positions.
    Status {
        /// State file (default: ~/.local/state/mirrorsync/state.json).
        #[arg(long, value_name = "FILE")]
        state: Option<PathBuf>,
    },

    /// Compute the MD5 of a file, as published on item pages.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

fn parse_threads(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("expected a number of threads >= 1, got {s:?}")),
    }
}

fn parse_since(s: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(s).ok_or_else(|| format!("expected YYYY-MM-DD[ HH:MM[:SS]], got {s:?}"))
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run {
                output,
                state,
                from,
                to,
                threads,
                include_listing,
                listing_since,
            } => {
                let mut cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                if let Some(n) = threads {
                    cfg.threads = n;
                }
                let args = RunArgs {
                    output,
                    state,
                    from,
                    to,
                    include_listing: include_listing || listing_since.is_some(),
                    listing_since,
                };
                run_sync(&cfg, args).await?;
            }
            CliCommand::Status { state } => run_status(state.as_deref())?,
            CliCommand::Checksum { path } => run_checksum(&path)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
