//! Page parsers and the newest-item lookup.
//!
//! These are thin wrappers around remote pages. The engine only depends on the
//! traits below; the HTML/RSS implementations are the defaults wired up by
//! the CLI.

mod detail;
mod feed;
mod listing;

pub use detail::{DetailPage, HtmlDetailParser};
pub use feed::{parse_latest_item_id, FeedError, RssLatestItem};
pub use listing::{parse_timestamp, HtmlListingParser, ListingEntry, ListingParseError};

use url::Url;

use crate::item::ItemId;

/// Extracts the reference digest and mirror links from an item detail page.
pub trait DetailParser: Send + Sync {
    fn parse(&self, page_url: &str, html: &str) -> DetailPage;
}

/// Extracts listing rows, newest first. A page without the expected structure
/// is an error; a well-formed page with no rows is an empty list.
pub trait ListingParser: Send + Sync {
    fn parse(&self, html: &str, base: &Url) -> Result<Vec<ListingEntry>, ListingParseError>;
}

/// Reports the newest item currently published.
pub trait LatestItemSource: Send + Sync {
    fn latest_item_id(&self) -> Result<ItemId, FeedError>;
}
