//! render_csv.rs - one quoted row per output item, in list order.
//!
//! Every field is quoted; remainder rows leave `consensus_points` empty;
//! scores carry six decimals.

use csv::{QuoteStyle, WriterBuilder};
use sl_core::OutputItem;

use crate::ReportError;

pub const CSV_HEADER: [&str; 7] = [
    "title",
    "source_title",
    "external_id",
    "segment",
    "consensus_points",
    "raw_count",
    "popularity_score",
];

pub fn render_csv(items: &[OutputItem]) -> Result<String, ReportError> {
    let mut w = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    w.write_record(CSV_HEADER).map_err(|e| ReportError::Render("csv", e.to_string()))?;

    for it in items {
        let points = it.consensus_points.map(|p| p.to_string()).unwrap_or_default();
        let raw = it.raw_count.to_string();
        let score = format!("{:.6}", it.popularity_score);
        w.write_record([
            it.title.as_str(),
            it.canonical_source_title.as_str(),
            it.external_id.as_str(),
            it.segment.as_str(),
            points.as_str(),
            raw.as_str(),
            score.as_str(),
        ])
        .map_err(|e| ReportError::Render("csv", e.to_string()))?;
    }

    let bytes = w.into_inner().map_err(|e| ReportError::Render("csv", e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Render("csv", e.to_string()))
}
