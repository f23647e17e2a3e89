//! User-facing progress lines.
//!
//! Workers report per-item and per-entry events through a [`Reporter`]. Each
//! event is also logged; when a channel is attached (the CLI does this) the
//! event is forwarded so it can be printed as it happens.

use std::fmt;

use chrono::NaiveDateTime;
use tokio::sync::mpsc::UnboundedSender;

use crate::item::ItemId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Something happened while processing an item.
    Item { id: ItemId, message: String },
    /// Something happened while syncing a listing entry.
    Listing {
        timestamp: NaiveDateTime,
        message: String,
    },
    /// Run-level note (ranges, cursors, skipped steps).
    Note(String),
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Item { id, message } => write!(f, "{id} {message}"),
            ProgressEvent::Listing { timestamp, message } => {
                write!(f, "{} {message}", timestamp.format("%Y-%m-%d"))
            }
            ProgressEvent::Note(message) => f.write_str(message),
        }
    }
}

/// Cheap to clone; one per worker.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    tx: Option<UnboundedSender<ProgressEvent>>,
}

impl Reporter {
    pub fn new(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Reporter that only logs.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn item(&self, id: ItemId, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(item = %id, "{message}");
        self.send(ProgressEvent::Item { id, message });
    }

    pub fn listing(&self, timestamp: NaiveDateTime, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(%timestamp, "{message}");
        self.send(ProgressEvent::Listing { timestamp, message });
    }

    pub fn note(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.send(ProgressEvent::Note(message));
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            // Receiver gone means nobody is printing; keep working.
            let _ = tx.send(event);
        }
    }
}
