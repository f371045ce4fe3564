//! Structured document capability
//!
//! Extraction code only needs a handful of tree queries: find descendants by
//! class or attribute, read an attribute, and read text. Those queries are
//! expressed as the [`StructuredDocument`] / [`DocumentNode`] pair so the
//! parsers in `crawler` never touch a concrete HTML engine.

mod html;

pub use html::HtmlDocument;

/// A node of a parsed document
pub trait DocumentNode: Sized {
    /// Descendant `tag` elements whose class list contains `class`
    fn find_by_class(&self, tag: &str, class: &str) -> Vec<Self>;

    /// Descendant `tag` elements
    fn find_tag(&self, tag: &str) -> Vec<Self>;

    /// Descendant `tag` elements carrying `attr`
    ///
    /// With `Some(value)` the attribute must contain `value` as one of its
    /// whitespace-separated words; with `None` presence is enough.
    fn find_by_attr(&self, tag: &str, attr: &str, value: Option<&str>) -> Vec<Self>;

    /// First descendant `tag` element whose class list contains `class`
    fn first_by_class(&self, tag: &str, class: &str) -> Option<Self> {
        self.find_by_class(tag, class).into_iter().next()
    }

    /// Attribute value, `None` when absent
    fn attr(&self, name: &str) -> Option<&str>;

    /// All descendant text nodes joined with `separator`
    fn text_content(&self, separator: &str) -> String;
}

/// A parsed document that can be queried from its root element
pub trait StructuredDocument {
    type Node<'a>: DocumentNode
    where
        Self: 'a;

    fn root(&self) -> Self::Node<'_>;
}
