//! crates/sl_io/src/markup.rs
//! Best-effort rank extraction from one HTML document.
//!
//! Strategies are tried in a fixed order and never combined; the first one
//! that yields at least one entry wins:
//! 1. `OrderedList`: ordered lists in document order, each with at least
//!    `min_list_items` direct items; rank is the 1-based item position.
//! 2. `Table`: `wikitable` tables, then `sortable`, then any other table;
//!    rank is the first standalone 1–3 digit number in a row's first cell.
//!
//! Duplicate ranks pass through untouched. Malformed markup yields nothing.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use sl_core::ids::namespace_excluded;
use sl_core::RankedEntry;
use tracing::debug;

use crate::{IoError, IoResult};

/// Extraction strategies, in the order they are attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    OrderedList,
    Table,
}

pub const STRATEGIES: [Strategy; 2] = [Strategy::OrderedList, Strategy::Table];

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::OrderedList => "ordered_list",
            Strategy::Table => "table",
        }
    }
}

/// Compiled selectors and the rank pattern. Build once, reuse per document.
#[derive(Debug)]
pub struct RankExtractor {
    min_list_items: usize,
    ol: Selector,
    table: Selector,
    tr: Selector,
    cell: Selector,
    italic: Selector,
    link: Selector,
    rank_re: Regex,
}

fn selector(css: &str) -> IoResult<Selector> {
    Selector::parse(css).map_err(|e| IoError::Invalid(format!("selector {css}: {e}")))
}

impl RankExtractor {
    pub fn new(min_list_items: usize) -> IoResult<Self> {
        Ok(Self {
            min_list_items,
            ol: selector("ol")?,
            table: selector("table")?,
            tr: selector("tr")?,
            cell: selector("th, td")?,
            italic: selector("i")?,
            link: selector("a")?,
            rank_re: Regex::new(r"\b([0-9]{1,3})\b")
                .map_err(|e| IoError::Invalid(format!("rank pattern: {e}")))?,
        })
    }

    /// Ranked entries of `html`, or empty.
    pub fn extract_ranked(&self, html: &str) -> Vec<RankedEntry> {
        self.extract_with_strategy(html)
            .map(|(_, entries)| entries)
            .unwrap_or_default()
    }

    /// Entries plus the strategy that produced them.
    pub fn extract_with_strategy(&self, html: &str) -> Option<(Strategy, Vec<RankedEntry>)> {
        let doc = Html::parse_document(html);
        for strategy in STRATEGIES {
            let found = match strategy {
                Strategy::OrderedList => self.from_ordered_lists(&doc),
                Strategy::Table => self.from_tables(&doc),
            };
            if let Some(entries) = found {
                debug!(strategy = strategy.as_str(), entries = entries.len(), "ranked entries extracted");
                return Some((strategy, entries));
            }
        }
        None
    }

    // ----------------------------- Strategies -----------------------------

    fn from_ordered_lists(&self, doc: &Html) -> Option<Vec<RankedEntry>> {
        for ol in doc.select(&self.ol) {
            let items: Vec<ElementRef<'_>> = ol
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|e| e.value().name() == "li")
                .collect();
            if items.len() < self.min_list_items {
                continue;
            }
            let mut out = Vec::new();
            for (idx, li) in items.iter().enumerate() {
                if let Some(title) = self.title_from_node(*li) {
                    push_entry(&mut out, idx as u32 + 1, title);
                }
            }
            if !out.is_empty() {
                return Some(out);
            }
        }
        None
    }

    fn from_tables(&self, doc: &Html) -> Option<Vec<RankedEntry>> {
        let mut data = Vec::new();
        let mut sortable = Vec::new();
        let mut other = Vec::new();
        for t in doc.select(&self.table) {
            if has_class(t, "wikitable") {
                data.push(t);
            } else if has_class(t, "sortable") {
                sortable.push(t);
            } else {
                other.push(t);
            }
        }

        for table in data.into_iter().chain(sortable).chain(other) {
            let mut out = Vec::new();
            for row in table.select(&self.tr) {
                let first = match row.select(&self.cell).next() {
                    Some(c) => c,
                    None => continue,
                };
                let rank = match self.extract_rank(&text_of(first)) {
                    Some(r) => r,
                    None => continue,
                };
                if let Some(title) = self.title_from_node(row) {
                    push_entry(&mut out, rank, title);
                }
            }
            if !out.is_empty() {
                return Some(out);
            }
        }
        None
    }

    // ----------------------------- Helpers -----------------------------

    /// First standalone 1–3 digit integer in `text`.
    pub fn extract_rank(&self, text: &str) -> Option<u32> {
        self.rank_re
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Title of a list item or table row.
    pub fn title_from_node(&self, node: ElementRef<'_>) -> Option<String> {
        if let Some(italic) = node.select(&self.italic).next() {
            if let Some(link) = italic.select(&self.link).next() {
                if is_wiki_href(link) {
                    let t = text_of(link);
                    if !t.is_empty() {
                        return Some(t);
                    }
                }
            }
            let t = text_of(italic);
            if !t.is_empty() {
                return Some(t);
            }
        }

        for link in node.select(&self.link) {
            if !is_wiki_href(link) {
                continue;
            }
            let title = match link.value().attr("title").map(str::trim) {
                Some(t) if !t.is_empty() => t.to_string(),
                _ => text_of(link),
            };
            if title.is_empty() || namespace_excluded(&title) {
                continue;
            }
            return Some(title);
        }
        None
    }
}

fn push_entry(out: &mut Vec<RankedEntry>, rank: u32, title: String) {
    // Rank 0 is not a placement.
    if let Ok(e) = RankedEntry::new(rank, title) {
        out.push(e);
    }
}

fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn is_wiki_href(link: ElementRef<'_>) -> bool {
    link.value().attr("href").is_some_and(|h| h.starts_with("/wiki/"))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ol_doc(n: usize, extra: &str) -> String {
        let mut s = String::from("<html><body><ol>");
        for i in 1..=n {
            s.push_str(&format!(
                "<li><i><a href=\"/wiki/Film_{i}\">Film {i}</a></i> ({})</li>",
                1900 + i
            ));
        }
        s.push_str("</ol>");
        s.push_str(extra);
        s.push_str("</body></html>");
        s
    }

    fn x() -> RankExtractor {
        RankExtractor::new(50).unwrap()
    }

    #[test]
    fn long_ordered_list_wins_with_positional_ranks() {
        let (strategy, entries) = x().extract_with_strategy(&ol_doc(60, "")).unwrap();
        assert_eq!(strategy, Strategy::OrderedList);
        assert_eq!(entries.len(), 60);
        assert_eq!(entries[0], RankedEntry::new(1, "Film 1").unwrap());
        assert_eq!(entries[59].rank, 60);
    }

    #[test]
    fn short_lists_fall_through_to_tables() {
        let table = r#"<table class="wikitable">
            <tr><th>Rank</th><th>Title</th></tr>
            <tr><td>1</td><td><i><a href="/wiki/Vertigo_(film)">Vertigo</a></i></td></tr>
            <tr><td>2=</td><td><i>Citizen Kane</i></td></tr>
            <tr><td>2=</td><td><a href="/wiki/File:X.jpg" title="File:X.jpg">img</a><a href="/wiki/Tokyo_Story" title="Tokyo Story">TS</a></td></tr>
        </table>"#;
        let (strategy, entries) = x().extract_with_strategy(&ol_doc(10, table)).unwrap();
        assert_eq!(strategy, Strategy::Table);
        let got: Vec<(u32, &str)> = entries.iter().map(|e| (e.rank, e.raw_title.as_str())).collect();
        assert_eq!(got, vec![(1, "Vertigo"), (2, "Citizen Kane"), (2, "Tokyo Story")]);
    }

    #[test]
    fn data_tables_are_preferred_over_earlier_plain_tables() {
        let html = r#"
            <table><tr><td>7</td><td><a href="/wiki/Plain">Plain</a></td></tr></table>
            <table class="sortable"><tr><td>3</td><td><a href="/wiki/Sorted">Sorted</a></td></tr></table>
            <table class="wikitable"><tr><td>5</td><td><a href="/wiki/Data">Data</a></td></tr></table>"#;
        let entries = x().extract_ranked(html);
        assert_eq!(entries, vec![RankedEntry::new(5, "Data").unwrap()]);
    }

    #[test]
    fn long_list_wins_over_a_table_without_mixing() {
        let table = r#"<table class="wikitable">
            <tr><td>1</td><td><i><a href="/wiki/Stalker">Stalker</a></i></td></tr>
        </table>"#;
        let (strategy, entries) = x().extract_with_strategy(&ol_doc(50, table)).unwrap();
        assert_eq!(strategy, Strategy::OrderedList);
        assert_eq!(entries.len(), 50);
        assert!(entries.iter().all(|e| e.raw_title != "Stalker"));
    }

    #[test]
    fn untitled_long_list_falls_through() {
        let untitled: String = (1..=50).map(|i| format!("<li>entry {i}</li>")).collect();
        let table = r#"<table class="wikitable">
            <tr><td>4</td><td><i><a href="/wiki/Stalker">Stalker</a></i></td></tr>
        </table>"#;

        // Next qualifying list.
        let html = ol_doc(50, "").replace("<body>", &format!("<body><ol>{untitled}</ol>"));
        let (strategy, entries) = x().extract_with_strategy(&html).unwrap();
        assert_eq!(strategy, Strategy::OrderedList);
        assert_eq!(entries[0], RankedEntry::new(1, "Film 1").unwrap());

        // No other list: tables.
        let html = format!("<html><body><ol>{untitled}</ol>{table}</body></html>");
        let (strategy, entries) = x().extract_with_strategy(&html).unwrap();
        assert_eq!(strategy, Strategy::Table);
        assert_eq!(entries, vec![RankedEntry::new(4, "Stalker").unwrap()]);
    }

    #[test]
    fn rank_token_must_be_standalone() {
        let x = x();
        assert_eq!(x.extract_rank("No. 12"), Some(12));
        assert_eq!(x.extract_rank("1958"), None);
        assert_eq!(x.extract_rank("—"), None);
        assert_eq!(x.extract_rank("T-3 (tie)"), Some(3));
    }

    #[test]
    fn empty_and_malformed_documents_yield_nothing() {
        assert!(x().extract_ranked("").is_empty());
        assert!(x().extract_ranked("<<<not html").is_empty());
        assert!(x().extract_ranked("<table><tr><td>no rank</td></tr></table>").is_empty());
    }

    #[test]
    fn namespace_links_are_skipped_for_titles() {
        let doc = Html::parse_fragment(
            r#"<li><a href="/wiki/Category:Films" title="Category:Films">c</a>
               <a href="https://example.org/x">ext</a>
               <a href="/wiki/Ikiru">Ikiru</a></li>"#,
        );
        let li = doc.select(&Selector::parse("li").unwrap()).next().unwrap();
        assert_eq!(x().title_from_node(li).as_deref(), Some("Ikiru"));
    }
}
