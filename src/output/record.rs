//! Text normalization and record serialization
//!
//! A serialized record is four newline-terminated lines:
//!
//! ```text
//! <tag1>, <tag2>, ...
//! <EOU>
//! <normalized body text>
//! <EOD>
//! ```

use crate::crawler::Entry;

/// Ends the tag line of a record
pub const END_OF_UTTERANCE: &str = "<EOU>";

/// Ends a record
pub const END_OF_DIALOG: &str = "<EOD>";

/// Collapses every whitespace run (newlines included) to one space and trims
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Renders an entry as one output record
pub fn serialize(entry: &Entry) -> String {
    format!(
        "{}\n{}\n{}\n{}\n",
        entry.tags.join(", "),
        END_OF_UTTERANCE,
        normalize(&entry.text),
        END_OF_DIALOG
    )
}
