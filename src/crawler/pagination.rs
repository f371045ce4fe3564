//! Pagination discovery for one category of one day
//!
//! The first archive page carries a `div.pageslist` container linking to the
//! remaining pages of the same day and category. [`DayPages`] fetches the
//! first page, reads that container, and then fetches each distinct linked
//! page on demand.

use crate::crawler::fetcher::PageFetcher;
use crate::document::{DocumentNode, HtmlDocument, StructuredDocument};
use crate::Result;
use std::collections::BTreeSet;
use url::Url;

pub const PAGINATION_CLASS: &str = "pageslist";

/// A fetched page: where it came from and its raw HTML
///
/// The parsed tree is rebuilt from `body` where it is needed, which keeps
/// `Page` sendable between tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub body: String,
}

impl Page {
    pub fn document(&self) -> HtmlDocument {
        HtmlDocument::parse(&self.body)
    }
}

/// Collects the distinct pagination targets of a page
///
/// Links are resolved against `site_root` and deduplicated by exact URL.
/// A page without a pagination container has no further pages. Links that
/// cannot be resolved are skipped.
pub fn pagination_links<D: StructuredDocument>(document: &D, site_root: &Url) -> Vec<Url> {
    let Some(container) = document.root().first_by_class("div", PAGINATION_CLASS) else {
        return Vec::new();
    };

    let unique: BTreeSet<Url> = container
        .find_by_attr("a", "href", None)
        .iter()
        .filter_map(|anchor| anchor.attr("href"))
        .filter_map(|href| match site_root.join(href) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("Skipping pagination link {}: {}", href, e);
                None
            }
        })
        .collect();

    unique.into_iter().collect()
}

/// Lazy sequence of the pages of one category on one day
///
/// The first page always comes first; the order of the remaining pages is
/// not significant. Each page is fetched when asked for, so the sequence can
/// only be walked once.
pub struct DayPages<'a> {
    fetcher: &'a PageFetcher,
    site_root: &'a Url,
    first: Option<Url>,
    rest: std::vec::IntoIter<Url>,
}

impl<'a> DayPages<'a> {
    pub fn new(fetcher: &'a PageFetcher, first_page: Url, site_root: &'a Url) -> Self {
        Self {
            fetcher,
            site_root,
            first: Some(first_page),
            rest: Vec::new().into_iter(),
        }
    }

    /// Fetches the next page, `None` once every page has been produced
    pub async fn next_page(&mut self) -> Option<Result<Page>> {
        if let Some(url) = self.first.take() {
            let body = match self.fetcher.fetch(url.as_str()).await {
                Ok(body) => body,
                Err(e) => return Some(Err(e)),
            };

            let links = discover(&body, self.site_root);
            tracing::debug!("Found {} pagination pages on {}", links.len(), url);
            self.rest = links.into_iter();

            return Some(Ok(Page {
                url: url.to_string(),
                body,
            }));
        }

        let url = self.rest.next()?;
        Some(
            self.fetcher
                .fetch(url.as_str())
                .await
                .map(|body| Page {
                    url: url.to_string(),
                    body,
                }),
        )
    }
}

fn discover(body: &str, site_root: &Url) -> Vec<Url> {
    let document = HtmlDocument::parse(body);
    pagination_links(&document, site_root)
}
