//! render_json.rs - pretty JSON with a trailing newline.
//! Key order follows the struct layout of `SeedListDoc` and `OutputItem`.

use sl_pipeline::SeedListDoc;

use crate::ReportError;

pub fn render_json(doc: &SeedListDoc) -> Result<String, ReportError> {
    let bytes = sl_io::json::to_json_bytes(doc).map_err(|e| ReportError::Render("json", e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Render("json", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn layout_and_segment_tokens() {
        let s = render_json(&fixtures::doc()).unwrap();
        assert!(s.ends_with("}\n"));
        assert!(s.find("\"generated_at\"").unwrap() < s.find("\"window\"").unwrap());
        assert!(s.find("\"window\"").unwrap() < s.find("\"items\"").unwrap());

        let v: serde_json::Value = serde_json::from_str(&s).unwrap();
        assert_eq!(v["items"][0]["segment"], "reserved");
        assert_eq!(v["items"][1]["segment"], "remainder");
        assert_eq!(v["items"][1]["consensus_points"], serde_json::Value::Null);
        assert_eq!(v["window"]["start"], "20240301");
    }
}
