//! `scraper`-backed implementation of the document capability

use crate::document::{DocumentNode, StructuredDocument};
use scraper::{ElementRef, Html, Selector};

/// An HTML page parsed with `scraper`
///
/// `scraper::Html` is not `Send`, so a document is built and dropped inside
/// synchronous extraction code and never held across an `.await`.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

impl StructuredDocument for HtmlDocument {
    type Node<'a> = ElementRef<'a>;

    fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}

impl<'a> DocumentNode for ElementRef<'a> {
    fn find_by_class(&self, tag: &str, class: &str) -> Vec<Self> {
        select(self, &format!("{}[class~=\"{}\"]", tag, escape(class)))
    }

    fn find_tag(&self, tag: &str) -> Vec<Self> {
        select(self, tag)
    }

    fn find_by_attr(&self, tag: &str, attr: &str, value: Option<&str>) -> Vec<Self> {
        let css = match value {
            Some(value) => format!("{}[{}~=\"{}\"]", tag, attr, escape(value)),
            None => format!("{}[{}]", tag, attr),
        };
        select(self, &css)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn text_content(&self, separator: &str) -> String {
        self.text().collect::<Vec<_>>().join(separator)
    }
}

fn select<'a>(node: &ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => node.select(&selector).collect(),
        Err(e) => {
            tracing::warn!("Invalid selector {}: {:?}", css, e);
            Vec::new()
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
