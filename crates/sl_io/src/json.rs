//! crates/sl_io/src/json.rs
//! JSON file helpers: pretty output (2-space indent, trailing newline)
//! and whole-file replacement.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{IoError, IoResult};

/// Serialize `value` as pretty JSON bytes ending in `\n`.
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T) -> IoResult<Vec<u8>> {
    let mut out = serde_json::to_vec_pretty(value)?;
    out.push(b'\n');
    Ok(out)
}

/// Write `value` to `path` as pretty JSON, atomically.
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> IoResult<()> {
    let bytes = to_json_bytes(value)?;
    write_bytes_atomic(path, &bytes)
}

/// Read and decode one JSON file.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> IoResult<T> {
    let bytes = fs::read(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    serde_json::from_slice(&bytes).map_err(|e| IoError::Json {
        pointer: path.display().to_string(),
        msg: e.to_string(),
    })
}

/// Replace `path` with `bytes` through a sibling `.part` file and a rename.
/// Parent directories are created; a failed write leaves no `.part` behind.
pub fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> IoResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("out");
    let part = path.with_file_name(format!(".{name}.{}.part", std::process::id()));

    let res = fs::write(&part, bytes).and_then(|()| fs::rename(&part, path));
    if res.is_err() {
        let _ = fs::remove_file(&part);
    }
    res.map_err(|e| IoError::Path(format!("{}: {e}", path.display())))
}
