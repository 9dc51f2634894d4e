//! crates/sl_io/src/payloads.rs
//! Pure decoders for collaborator payloads, plus article/URL helpers.
//!
//! Decoders are tolerant of missing containers (an absent `items` array is an
//! empty result) but reject values of the wrong JSON type.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::Value;
use sl_core::ids::{article_to_title, title_to_article};
pub use sl_core::TopArticle;
use sl_core::CandidateItem;
use url::Url;

use crate::IoResult;

/// Path segment encoding: unreserved characters stay, everything else is escaped.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'.').remove(b'-').remove(b'~');

// ----------------------------- Wire types -----------------------------

#[derive(Deserialize)]
struct TopPayload {
    #[serde(default)]
    items: Vec<TopItem>,
}

#[derive(Deserialize)]
struct TopItem {
    #[serde(default)]
    articles: Vec<TopArticle>,
}

#[derive(Deserialize)]
struct DailyPayload {
    #[serde(default)]
    items: Vec<DailyItem>,
}

#[derive(Deserialize)]
struct DailyItem {
    #[serde(default)]
    views: u64,
}

// ----------------------------- Decoders -----------------------------

/// Monthly top list: `items[0].articles`, in payload order.
pub fn decode_top_month(v: &Value) -> IoResult<Vec<TopArticle>> {
    let p: TopPayload = serde_json::from_value(v.clone())?;
    Ok(p.items.into_iter().next().map(|i| i.articles).unwrap_or_default())
}

/// Per-article daily series: sum of `items[].views`.
pub fn decode_daily_total(v: &Value) -> IoResult<u64> {
    let p: DailyPayload = serde_json::from_value(v.clone())?;
    Ok(p.items.iter().fold(0u64, |acc, i| acc.saturating_add(i.views)))
}

/// Open-search result `[query, [title, ...], ...]`: the first title, if any.
pub fn decode_search_first(v: &Value) -> Option<String> {
    let arr = v.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    arr[1].as_array()?.first()?.as_str().map(str::to_string)
}

/// Parse result: the HTML under `parse.text["*"]`.
pub fn decode_parse_html(v: &Value) -> Option<String> {
    v.get("parse")?
        .get("text")?
        .get("*")?
        .as_str()
        .map(str::to_string)
}

/// Entity bindings: one `CandidateItem` per binding with an article and an item.
///
/// `external_id` is the last path segment of the item URI; `canonical_title`
/// is the label when present and non-empty, else the article title.
pub fn decode_entity_bindings(v: &Value) -> Vec<CandidateItem> {
    let bindings = match v.pointer("/results/bindings").and_then(Value::as_array) {
        Some(b) => b,
        None => return Vec::new(),
    };
    let mut out = Vec::with_capacity(bindings.len());
    for b in bindings {
        let article = match b.pointer("/article/value").and_then(Value::as_str) {
            Some(a) => a,
            None => continue,
        };
        let item = match b.pointer("/item/value").and_then(Value::as_str) {
            Some(i) => i,
            None => continue,
        };
        let source_title = url_to_title(article);
        let external_id = item.rsplit('/').next().unwrap_or(item).to_string();
        let label = b
            .pointer("/itemLabel/value")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| source_title.clone());
        out.push(CandidateItem::new(label, source_title, external_id));
    }
    out
}

// ----------------------------- Helpers -----------------------------

/// Percent-encoded article segment (`Amélie` → `Am%C3%A9lie`).
pub fn encode_article(title: &str) -> String {
    utf8_percent_encode(&title_to_article(title), SEGMENT).to_string()
}

/// Title from an article URL (last path segment, decoded, `_` → space).
/// Falls back to treating the input as a bare path when it does not parse.
pub fn url_to_title(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(u) => u.path().to_string(),
        Err(_) => url.to_string(),
    };
    let last = path.rsplit('/').next().unwrap_or("");
    article_to_title(&percent_decode_str(last).decode_utf8_lossy())
}
