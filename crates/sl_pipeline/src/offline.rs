//! offline.rs
//! Every collaborator backed by a payload cache directory.
//!
//! Entity resolution first looks for a batch-exact payload
//! (`entities_<sha256>`), then falls back to the aggregate `entities` payload
//! filtered to the requested titles. With writes enabled, the filtered batch
//! is stored under its exact key.

use std::collections::HashSet;

use serde_json::{json, Value};
use sl_core::{CandidateItem, Identity, TopArticle};
use sl_io::cache::{self, PayloadCache, ENTITIES_KEY};
use sl_io::hasher::batch_key;
use sl_io::payloads;
use tracing::debug;

use crate::sources::{CounterSource, DiscoverySource, DocumentSource, Resolver, SourceError};
use crate::window::{DateWindow, MonthKey};

#[derive(Debug, Clone)]
pub struct CachedSources {
    cache: PayloadCache,
}

impl CachedSources {
    pub fn new(cache: PayloadCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &PayloadCache {
        &self.cache
    }

    fn required(&self, key: &str) -> Result<Value, SourceError> {
        self.cache
            .get_value(key)?
            .ok_or_else(|| SourceError::Missing(key.to_string()))
    }

    fn batch_bindings(&self, titles: &[String]) -> Result<Value, SourceError> {
        let exact = batch_key(ENTITIES_KEY, titles);
        if let Some(v) = self.cache.get_value(&exact)? {
            debug!(key = %exact, "entity batch hit");
            return Ok(v);
        }
        let all = self.required(ENTITIES_KEY)?;
        let wanted: HashSet<Identity> = titles.iter().map(|t| Identity::of(t)).collect();
        let kept: Vec<Value> = all
            .pointer("/results/bindings")
            .and_then(Value::as_array)
            .map(|bs| {
                bs.iter()
                    .filter(|b| {
                        b.pointer("/article/value")
                            .and_then(Value::as_str)
                            .map(|a| wanted.contains(&Identity::of(&payloads::url_to_title(a))))
                            .unwrap_or(false)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let batch = json!({ "results": { "bindings": kept } });
        if self.cache.put(&exact, &batch)? {
            debug!(key = %exact, "entity batch stored");
        }
        Ok(batch)
    }
}

impl DiscoverySource for CachedSources {
    fn top_month(&self, month: MonthKey) -> Result<Vec<TopArticle>, SourceError> {
        let v = self.required(&cache::top_key(month.year, month.month))?;
        Ok(payloads::decode_top_month(&v)?)
    }
}

impl DocumentSource for CachedSources {
    fn find_page(&self, query: &str) -> Result<Option<String>, SourceError> {
        let v = self.required(&cache::search_key(query))?;
        Ok(payloads::decode_search_first(&v))
    }

    fn fetch_document(&self, page: &str) -> Result<Option<String>, SourceError> {
        let v = self.required(&cache::parse_key(page))?;
        Ok(payloads::decode_parse_html(&v))
    }
}

impl Resolver for CachedSources {
    type Error = SourceError;

    fn resolve(&self, titles: &[String]) -> Result<Vec<CandidateItem>, SourceError> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }
        let v = self.batch_bindings(titles)?;
        Ok(payloads::decode_entity_bindings(&v))
    }
}

impl CounterSource for CachedSources {
    fn fetch_count(&self, title: &str, window: &DateWindow) -> Result<u64, SourceError> {
        let v = self.required(&cache::pageviews_key(title, &window.start, &window.end))?;
        Ok(payloads::decode_daily_total(&v)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> Value {
        json!({"results": {"bindings": [
            {"article": {"value": "https://en.wikipedia.org/wiki/Alien_(film)"},
             "item": {"value": "http://www.wikidata.org/entity/Q103569"},
             "itemLabel": {"value": "Alien"}},
            {"article": {"value": "https://en.wikipedia.org/wiki/Heat_(1995_film)"},
             "item": {"value": "http://www.wikidata.org/entity/Q215718"},
             "itemLabel": {"value": "Heat"}}
        ]}})
    }

    #[test]
    fn resolves_from_aggregate_and_stores_batch() {
        let dir = tempfile::tempdir().unwrap();
        let rw = PayloadCache::new(dir.path()).with_writes(true);
        rw.put(ENTITIES_KEY, &entities()).unwrap();

        let src = CachedSources::new(rw);
        let titles = vec!["Alien (film)".to_string(), "Taylor Swift".to_string()];
        let got = src.resolve(&titles).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].canonical_title, "Alien");
        assert_eq!(got[0].external_id, "Q103569");
        assert!(src.cache().contains(&batch_key(ENTITIES_KEY, &titles)));
    }

    #[test]
    fn missing_payloads_are_reported_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let src = CachedSources::new(PayloadCache::new(dir.path()));
        let w = DateWindow { start: "20240101".into(), end: "20241231".into() };
        assert_eq!(
            src.fetch_count("Heat (1995 film)", &w),
            Err(SourceError::Missing("pv_Heat_%281995_film%29_20240101_20241231".into()))
        );
        assert!(matches!(src.top_month(MonthKey { year: 2024, month: 5 }), Err(SourceError::Missing(k)) if k == "top_2024_05"));
        assert!(matches!(src.resolve(&["x".to_string()]), Err(SourceError::Missing(_))));
    }

    #[test]
    fn reads_counts_and_documents() {
        let dir = tempfile::tempdir().unwrap();
        let rw = PayloadCache::new(dir.path()).with_writes(true);
        let w = DateWindow { start: "20240101".into(), end: "20241231".into() };
        rw.put(&cache::pageviews_key("Alien (film)", &w.start, &w.end), &json!({"items": [{"views": 4}, {"views": 6}]}))
            .unwrap();
        rw.put(&cache::search_key("AFI"), &json!(["AFI", ["AFI 100"], [], []])).unwrap();
        rw.put(&cache::parse_key("AFI 100"), &json!({"parse": {"text": {"*": "<p>x</p>"}}})).unwrap();

        let src = CachedSources::new(PayloadCache::new(dir.path()));
        assert_eq!(src.fetch_count("Alien (film)", &w), Ok(10));
        assert_eq!(src.find_page("AFI").unwrap().as_deref(), Some("AFI 100"));
        assert_eq!(src.fetch_document("AFI 100").unwrap().as_deref(), Some("<p>x</p>"));
    }
}
