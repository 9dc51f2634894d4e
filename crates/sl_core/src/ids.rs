//! crates/sl_core/src/ids.rs
//! Identity keys and title-shape helpers. Pure, no I/O.
//!
//! An `Identity` is the normalized form of a human-readable title and is the only
//! key used to join discovery titles, consensus-list titles, traffic counts and
//! weights. Normalization collapses whitespace runs, trims, and lower-cases.
//! Punctuation and diacritics are kept as-is (no Unicode folding), so
//! "Amélie" and "Amelie" remain distinct identities.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Namespace prefixes whose pages are never content articles.
pub const EXCLUDED_NAMESPACE_PREFIXES: [&str; 12] = [
    "File",
    "Category",
    "Wikipedia",
    "Template",
    "Portal",
    "Help",
    "Special",
    "Talk",
    "User",
    "Draft",
    "Module",
    "Book",
];

/// Canonicalize a title into its dedup key.
pub fn normalize(title: &str) -> String {
    let lower = title.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    for (i, word) in lower.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Normalized title used as the deduplication key.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Identity(String);

impl Identity {
    /// Identity of a raw title.
    pub fn of(title: &str) -> Self {
        Self(normalize(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Identity::of(s)
    }
}

/// True if the `Prefix:` part of a title names an excluded namespace.
pub fn namespace_excluded(title: &str) -> bool {
    match title.split_once(':') {
        Some((prefix, _)) => EXCLUDED_NAMESPACE_PREFIXES.contains(&prefix),
        None => false,
    }
}

/// True for content-article titles (not the main page, not a meta namespace).
pub fn is_article_title(title: &str) -> bool {
    if title == "Main_Page" || title == "Main Page" {
        return false;
    }
    !namespace_excluded(title)
}

/// Article path form of a title (`The Third Man` → `The_Third_Man`).
pub fn title_to_article(title: &str) -> String {
    title.replace(' ', "_")
}

/// Display form of an article path (`The_Third_Man` → `The Third Man`).
pub fn article_to_title(article: &str) -> String {
    article.replace('_', " ")
}
