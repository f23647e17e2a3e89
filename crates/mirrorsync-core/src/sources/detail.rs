//! Item detail page: reference MD5 and "Download from" mirror links.

use std::sync::OnceLock;

use scraper::{Html, Selector};
use url::Url;

use super::DetailParser;
use crate::checksum::ReferenceHash;
use crate::mirror::MirrorCandidate;

const MIRROR_LINK_PREFIX: &str = "Download from";
const CHECKSUM_LABEL: &str = "MD5 Checksum:";

/// What an item page tells us.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    pub reference_hash: Option<ReferenceHash>,
    /// Mirrors in page order.
    pub mirrors: Vec<MirrorCandidate>,
}

/// Parses item pages shaped like
/// `<li><strong>MD5 Checksum: </strong>abc…</li>` and
/// `<a href="https://mirror/…">Download from mirror</a>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDetailParser;

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("static selector"))
}

fn list_item_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("li").expect("static selector"))
}

impl DetailParser for HtmlDetailParser {
    fn parse(&self, page_url: &str, html: &str) -> DetailPage {
        let document = Html::parse_document(html);
        let base = Url::parse(page_url).ok();

        let reference_hash = document.select(list_item_selector()).find_map(|li| {
            let text: String = li.text().collect();
            let rest = &text[text.find(CHECKSUM_LABEL)? + CHECKSUM_LABEL.len()..];
            let digest: String = rest
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_hexdigit())
                .collect();
            ReferenceHash::parse(&digest)
        });

        let mut mirrors = Vec::new();
        for anchor in document.select(anchor_selector()) {
            let text: String = anchor.text().collect();
            if !text.trim_start().starts_with(MIRROR_LINK_PREFIX) {
                continue;
            }
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let resolved = match &base {
                Some(b) => b.join(href.trim()).ok(),
                None => Url::parse(href.trim()).ok(),
            };
            match resolved.and_then(MirrorCandidate::from_url) {
                Some(candidate) => mirrors.push(candidate),
                None => tracing::debug!(page_url, href, "ignoring unusable mirror link"),
            }
        }

        DetailPage {
            reference_hash,
            mirrors,
        }
    }
}
