//! Discovery totals: per-title view sums over a window of monthly top lists.

use std::collections::HashMap;

use sl_core::ids::{article_to_title, is_article_title};
use sl_core::TopArticle;

/// View totals keyed by display title (`_` already turned into spaces).
/// Titles keep first-appearance order across the window.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiscoveryTotals {
    order: Vec<String>,
    views: HashMap<String, u64>,
}

impl DiscoveryTotals {
    pub fn add(&mut self, title: String, views: u64) {
        match self.views.get_mut(&title) {
            Some(v) => *v = v.saturating_add(views),
            None => {
                self.views.insert(title.clone(), views);
                self.order.push(title);
            }
        }
    }

    /// Titles in first-appearance order.
    pub fn titles(&self) -> &[String] {
        &self.order
    }

    #[cfg(test)]
    fn views(&self, title: &str) -> u64 {
        self.views.get(title).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Fold months of top lists into totals.
///
/// Per month only the first `top_limit` entries count; non-article titles
/// (main page, meta namespaces) and empty titles are skipped.
pub fn accumulate_discovery<M, A>(months: M, top_limit: usize) -> DiscoveryTotals
where
    M: IntoIterator<Item = A>,
    A: AsRef<[TopArticle]>,
{
    let mut totals = DiscoveryTotals::default();
    for month in months {
        for entry in month.as_ref().iter().take(top_limit) {
            if entry.article.is_empty() || !is_article_title(&entry.article) {
                continue;
            }
            totals.add(article_to_title(&entry.article), entry.views);
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(xs: &[(&str, u64)]) -> Vec<TopArticle> {
        xs.iter().map(|&(a, v)| TopArticle::new(a, v)).collect()
    }

    #[test]
    fn sums_views_and_filters_meta_pages() {
        let m1 = month(&[
            ("Main_Page", 1_000_000),
            ("Special:Search", 500_000),
            ("Oppenheimer_(film)", 300),
            ("Barbie_(film)", 200),
        ]);
        let m2 = month(&[("Barbie_(film)", 50), ("Dune:_Part_Two", 40), ("", 10)]);
        let t = accumulate_discovery([m1, m2], 1000);
        assert_eq!(t.titles(), ["Oppenheimer (film)", "Barbie (film)", "Dune: Part Two"]);
        assert_eq!(t.views("Barbie (film)"), 250);
        assert_eq!(t.views("Missing"), 0);
    }

    #[test]
    fn top_limit_applies_per_month_before_filtering() {
        let m1 = month(&[("Main_Page", 9), ("Alien_(film)", 5), ("Heat_(1995_film)", 4)]);
        let m2 = month(&[("Heat_(1995_film)", 3), ("Ran_(film)", 2)]);
        let t = accumulate_discovery(vec![m1, m2], 2);
        // Month 1 keeps only Main_Page and Alien; month 2 keeps Heat and Ran.
        assert_eq!(t.titles(), ["Alien (film)", "Heat (1995 film)", "Ran (film)"]);
        assert_eq!(t.views("Heat (1995 film)"), 3);
    }
}
