//! Entry extraction from archive pages
//!
//! An archive page lists posts as `div.topicbox[id]` blocks. Each block has a
//! `div.text` body and optionally a `div.tags` container of tag anchors. The
//! page category comes from the `release/<category>/day/` segment of the
//! page's canonical link.

use crate::crawler::pagination::Page;
use crate::document::{DocumentNode, HtmlDocument, StructuredDocument};
use crate::{CrawlerError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

pub const ENTRY_CLASS: &str = "topicbox";
pub const TAGS_CLASS: &str = "tags";
pub const TEXT_CLASS: &str = "text";

/// One extracted post
///
/// `tags[0]` is always the page category; the rest are the post's own labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub tags: Vec<String>,
    pub text: String,
}

/// Extracts every entry of a parsed page
///
/// A page without entry blocks yields an empty list. Once entries exist,
/// a missing canonical link, canonical `href`, or entry text container is a
/// malformed page.
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `page_url` - The URL the page was fetched from, for error reporting
pub fn parse_entries<D: StructuredDocument>(document: &D, page_url: &str) -> Result<Vec<Entry>> {
    let root = document.root();

    let blocks: Vec<_> = root
        .find_by_class("div", ENTRY_CLASS)
        .into_iter()
        .filter(|block| block.attr("id").is_some())
        .collect();

    if blocks.is_empty() {
        return Ok(Vec::new());
    }

    let category = page_category(&root, page_url)?;

    blocks
        .iter()
        .map(|block| -> Result<Entry> {
            let mut tags = vec![category.clone()];
            if let Some(container) = block.first_by_class("div", TAGS_CLASS) {
                tags.extend(
                    container
                        .find_tag("a")
                        .iter()
                        .map(|anchor| anchor.text_content("")),
                );
            }

            let text = block
                .first_by_class("div", TEXT_CLASS)
                .ok_or_else(|| malformed(page_url, "entry without text container"))?
                .text_content("\n");

            Ok(Entry { tags, text })
        })
        .collect()
}

/// Parses a fetched page and extracts its entries
pub fn extract_entries(page: &Page) -> Result<Vec<Entry>> {
    let document = HtmlDocument::parse(&page.body);
    parse_entries(&document, &page.url)
}

fn page_category<N: DocumentNode>(root: &N, page_url: &str) -> Result<String> {
    let link = root
        .find_by_attr("link", "rel", Some("canonical"))
        .into_iter()
        .next()
        .ok_or_else(|| malformed(page_url, "missing canonical link"))?;

    let href = link
        .attr("href")
        .ok_or_else(|| malformed(page_url, "canonical link without href"))?;

    category_from_canonical(href)
        .map(str::to_string)
        .ok_or_else(|| malformed(page_url, &format!("no category in canonical link {}", href)))
}

static CANONICAL_CATEGORY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"release/(.+?)/day/").expect("Failed to compile canonical category regex")
});

/// Returns the `<category>` of the first `release/<category>/day/` in `href`
pub fn category_from_canonical(href: &str) -> Option<&str> {
    CANONICAL_CATEGORY
        .captures(href)?
        .get(1)
        .map(|category| category.as_str())
}

fn malformed(url: &str, message: &str) -> CrawlerError {
    CrawlerError::MalformedPage {
        url: url.to_string(),
        message: message.to_string(),
    }
}
