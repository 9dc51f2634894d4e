//! sources.rs
//! Collaborator seams. The engine never performs network I/O itself: payloads
//! come from implementations of these traits (cache-backed in the binary,
//! in-memory in tests).

use sl_core::TopArticle;
use sl_io::IoError;
use thiserror::Error;

use crate::window::{DateWindow, MonthKey};

pub use sl_algo::Resolver;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// No payload exists for the key.
    #[error("missing payload: {0}")]
    Missing(String),
    /// Reading the payload failed.
    #[error("io: {0}")]
    Io(String),
    /// The payload exists but has the wrong shape.
    #[error("decode: {0}")]
    Decode(String),
}

impl From<IoError> for SourceError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Json { pointer, msg } => SourceError::Decode(format!("{pointer}: {msg}")),
            other => SourceError::Io(other.to_string()),
        }
    }
}

/// Monthly top lists for the discovery window.
pub trait DiscoverySource {
    fn top_month(&self, month: MonthKey) -> Result<Vec<TopArticle>, SourceError>;
}

/// List documents: locate a page by search query, then fetch its markup.
pub trait DocumentSource {
    fn find_page(&self, query: &str) -> Result<Option<String>, SourceError>;
    fn fetch_document(&self, page: &str) -> Result<Option<String>, SourceError>;
}

/// Traffic counter per title over a fixed window. Called from worker threads.
pub trait CounterSource: Sync {
    fn fetch_count(&self, title: &str, window: &DateWindow) -> Result<u64, SourceError>;
}
