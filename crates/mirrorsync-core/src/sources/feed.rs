//! Newest item number from the site's RSS feed.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::LatestItemSource;
use crate::fetch::{get_text, FetchError, HttpFetcher};
use crate::item::ItemId;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("could not fetch feed: {0}")]
    Fetch(#[from] FetchError),
    #[error("feed has no <item> with a <link>")]
    NoEntries,
    #[error("no item number in feed link: {0}")]
    NoItemNumber(String),
}

fn first_item_link() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<item\b.*?<link>\s*(?:<!\[CDATA\[)?\s*(.*?)\s*(?:\]\]>)?\s*</link>")
            .expect("static pattern")
    })
}

fn digits() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("static pattern"))
}

/// Item number linked from the first `<item>` of an RSS document: the first
/// run of digits in its `<link>`.
pub fn parse_latest_item_id(xml: &str) -> Result<ItemId, FeedError> {
    let link = first_item_link()
        .captures(xml)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or(FeedError::NoEntries)?;
    digits()
        .find(link)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .and_then(ItemId::new)
        .ok_or_else(|| FeedError::NoItemNumber(link.to_string()))
}

/// [`LatestItemSource`] backed by an RSS feed URL.
pub struct RssLatestItem {
    fetcher: Arc<dyn HttpFetcher>,
    feed_url: String,
}

impl RssLatestItem {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, feed_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            feed_url: feed_url.into(),
        }
    }
}

impl LatestItemSource for RssLatestItem {
    fn latest_item_id(&self) -> Result<ItemId, FeedError> {
        let xml = get_text(self.fetcher.as_ref(), &self.feed_url)?;
        let id = parse_latest_item_id(&xml)?;
        tracing::debug!(feed = %self.feed_url, %id, "latest item from feed");
        Ok(id)
    }
}
