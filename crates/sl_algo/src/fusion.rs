//! Candidate fusion: one deduplicated universe keyed by identity.
//!
//! Insert-if-absent: the first item seen for an identity is kept as-is and
//! every later item with the same identity is a no-op. `all()` returns
//! candidates in insertion order.

use std::collections::HashMap;
use std::fmt;

use sl_core::{CandidateItem, Identity};
use tracing::debug;

/// Maps raw titles to verified candidates. Titles that are not entities of the
/// target kind are simply absent from the result.
pub trait Resolver {
    type Error: fmt::Display;

    fn resolve(&self, titles: &[String]) -> Result<Vec<CandidateItem>, Self::Error>;
}

#[derive(Debug, Default, Clone)]
pub struct FusionMap {
    index: HashMap<Identity, usize>,
    items: Vec<CandidateItem>,
}

impl FusionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the identity is already present. Returns true if inserted.
    /// Items whose identity normalizes to empty are rejected.
    pub fn insert(&mut self, item: CandidateItem) -> bool {
        let id = item.identity();
        if id.is_empty() || self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id, self.items.len());
        self.items.push(item);
        true
    }

    /// Insert many; returns the number actually inserted.
    pub fn add_items<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = CandidateItem>,
    {
        let mut n = 0;
        for it in items {
            if self.insert(it) {
                n += 1;
            }
        }
        n
    }

    /// Resolve `titles` in chunks of `batch_size` and fold the results in.
    /// A resolver failure aborts the batch; items already folded stay.
    pub fn add_batch<R: Resolver + ?Sized>(
        &mut self,
        titles: &[String],
        resolver: &R,
        batch_size: usize,
    ) -> Result<usize, R::Error> {
        let mut inserted = 0usize;
        let mut resolved = 0usize;
        for chunk in titles.chunks(batch_size.max(1)) {
            let items = resolver.resolve(chunk)?;
            resolved += items.len();
            inserted += self.add_items(items);
        }
        debug!(titles = titles.len(), resolved, inserted, total = self.items.len(), "batch fused");
        Ok(inserted)
    }

    /// Candidates in insertion order.
    pub fn all(&self) -> &[CandidateItem] {
        &self.items
    }

    pub fn get(&self, id: &Identity) -> Option<&CandidateItem> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn contains(&self, id: &Identity) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
