//! crates/sl_io/src/weights.rs
//! External weight file: `title,weight` rows, `#` comments, no header.
//!
//! Malformed rows (fewer than two fields, empty title, unparsable or
//! out-of-range weight) are skipped silently. Later rows overwrite earlier
//! rows with the same identity.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sl_core::Identity;
use tracing::debug;

use crate::{IoError, IoResult};

pub type WeightMap = HashMap<Identity, f64>;

/// Parse weight rows from any reader.
///
/// Each line is its own csv record, so an unbalanced quote costs only the
/// line it sits on.
pub fn parse_weights<R: Read>(reader: R) -> WeightMap {
    let mut out = WeightMap::new();
    let mut skipped = 0usize;
    for line in BufReader::new(reader).lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_line(trimmed) {
            Some((id, w)) => {
                out.insert(id, w);
            }
            None => skipped += 1,
        }
    }
    debug!(rows = out.len(), skipped, "weight rows parsed");
    out
}

fn parse_line(line: &str) -> Option<(Identity, f64)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());
    let rec = rdr.records().next()?.ok()?;
    parse_row(&rec)
}

fn parse_row(rec: &csv::StringRecord) -> Option<(Identity, f64)> {
    if rec.len() < 2 {
        return None;
    }
    let title = rec.get(0)?;
    let id = Identity::of(title);
    if id.is_empty() {
        return None;
    }
    let w: f64 = rec.get(1)?.parse().ok()?;
    if !w.is_finite() || !(0.0..=1.0).contains(&w) {
        return None;
    }
    Some((id, w))
}

/// Load a weight file; `None` means "no weights supplied" (empty map).
pub fn load_weights(path: Option<&Path>) -> IoResult<WeightMap> {
    let path = match path {
        Some(p) => p,
        None => return Ok(WeightMap::new()),
    };
    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    Ok(parse_weights(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_skips_malformed_rows() {
        let text = "\
# title,weight
The Godfather,0.9
  Spirited  Away , 0.4
lonely
Heat,abc
Alien,1.5
\"Crouching Tiger, Hidden Dragon\",0.2
,0.3
";
        let w = parse_weights(text.as_bytes());
        assert_eq!(w.len(), 3);
        assert_eq!(w.get(&Identity::of("the godfather")), Some(&0.9));
        assert_eq!(w.get(&Identity::of("Spirited Away")), Some(&0.4));
        assert_eq!(w.get(&Identity::of("Crouching Tiger, Hidden Dragon")), Some(&0.2));
        assert!(!w.contains_key(&Identity::of("Heat")));
        assert!(!w.contains_key(&Identity::of("Alien")));
    }

    #[test]
    fn unbalanced_quote_costs_only_its_own_line() {
        let w = parse_weights("Heat,0.5\n\"Bad row,0.3\nAlien,0.9\nRan,0.2\n".as_bytes());
        assert_eq!(w.len(), 3);
        assert_eq!(w.get(&Identity::of("heat")), Some(&0.5));
        assert_eq!(w.get(&Identity::of("alien")), Some(&0.9));
        assert_eq!(w.get(&Identity::of("ran")), Some(&0.2));
        assert!(!w.contains_key(&Identity::of("Bad row")));
    }

    #[test]
    fn no_path_means_empty_map() {
        assert!(load_weights(None).unwrap().is_empty());
    }

    #[test]
    fn loads_from_file_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("w.csv");
        std::fs::write(&p, "Ran,0.5\n").unwrap();
        let w = load_weights(Some(&p)).unwrap();
        assert_eq!(w.get(&Identity::of("ran")), Some(&0.5));
        assert!(load_weights(Some(&dir.path().join("missing.csv"))).is_err());
    }
}
