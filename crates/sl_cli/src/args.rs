// crates/sl_cli/src/args.rs
//
// Offline CLI argument surface.
//
// - No networked paths (reject any scheme:// like http/https/file)
// - --payload-dir must be an existing directory of cached payloads
// - --manifest / --weight-file must be existing local files when given
// - Numeric flags override manifest params; domains are checked after merging
// - --validate-only stops after config + weights are loaded

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Parser;
use sl_core::Params;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "seedlist",
    disable_help_subcommand = true,
    about = "Build a seed list from cached discovery, list and traffic payloads"
)]
pub struct Args {
    // --- Inputs ---
    /// Directory of cached payloads (`<key>.json`).
    #[arg(long)]
    pub payload_dir: PathBuf,
    /// Run manifest JSON (params override + consensus lists).
    #[arg(long)]
    pub manifest: Option<PathBuf>,
    /// Two-column weight file (title, weight in [0,1]); overrides the manifest's.
    #[arg(long)]
    pub weight_file: Option<PathBuf>,

    // --- Output ---
    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    // --- Param overrides ---
    #[arg(long)]
    pub months: Option<u32>,
    #[arg(long)]
    pub top_limit: Option<usize>,
    #[arg(long)]
    pub goat_limit: Option<usize>,
    #[arg(long)]
    pub seed_limit: Option<usize>,
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Reference date (YYYY-MM-DD); the window ends with the month before it.
    #[arg(long, value_parser = parse_date)]
    pub as_of: Option<NaiveDate>,

    // --- Control ---
    /// Store derived payloads (per-batch entity files) back into the payload dir.
    #[arg(long)]
    pub save_cache: bool,
    /// Validate config and inputs only; do not run the engine.
    #[arg(long)]
    pub validate_only: bool,
    /// Only warnings and errors on stderr.
    #[arg(long)]
    pub quiet: bool,
}

impl Args {
    /// `base` with every numeric flag that was given applied on top.
    pub fn apply_overrides(&self, mut base: Params) -> Params {
        if let Some(v) = self.months {
            base.months = v;
        }
        if let Some(v) = self.top_limit {
            base.top_limit = v;
        }
        if let Some(v) = self.goat_limit {
            base.goat_limit = v;
        }
        if let Some(v) = self.seed_limit {
            base.seed_limit = v;
        }
        if let Some(v) = self.max_workers {
            base.max_workers = v;
        }
        base
    }
}

/// Errors surfaced by argument parsing/validation.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
    NotADirectory(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be local (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            NotADirectory(p) => write!(f, "not a directory: {p}"),
        }
    }
}

impl std::error::Error for CliError {}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| format!("expected YYYY-MM-DD, got {s:?}"))
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    check(Args::parse())
}

/// Path policy checks on already parsed arguments.
pub fn check(args: Args) -> Result<Args, CliError> {
    for p in iter_all_paths(&args) {
        ensure_local_path(p)?;
    }
    let meta = fs::metadata(&args.payload_dir)
        .map_err(|_| CliError::NotFound(format!("--payload-dir {}", args.payload_dir.display())))?;
    if !meta.is_dir() {
        return Err(CliError::NotADirectory(format!("--payload-dir {}", args.payload_dir.display())));
    }
    if let Some(m) = &args.manifest {
        ensure_local_file(m, "--manifest")?;
    }
    if let Some(w) = &args.weight_file {
        ensure_local_file(w, "--weight-file")?;
    }
    Ok(args)
}

fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if sl_io::has_scheme(s) || s.trim().to_ascii_lowercase().starts_with("file:") {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn ensure_local_file(p: &Path, label: &'static str) -> Result<(), CliError> {
    match fs::metadata(p) {
        Ok(m) if m.is_file() => Ok(()),
        _ => Err(CliError::NotFound(format!("{label} {}", p.display()))),
    }
}

fn iter_all_paths(args: &Args) -> impl Iterator<Item = &Path> {
    [
        Some(args.payload_dir.as_path()),
        args.manifest.as_deref(),
        args.weight_file.as_deref(),
        Some(args.output_dir.as_path()),
    ]
    .into_iter()
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["seedlist"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn overrides_apply_only_when_given() {
        let a = parse(&["--payload-dir", "p", "--goat-limit", "10", "--months", "3"]);
        let p = a.apply_overrides(Params::default());
        assert_eq!(p.goat_limit, 10);
        assert_eq!(p.months, 3);
        assert_eq!(p.seed_limit, 500);
        assert_eq!(a.output_dir, PathBuf::from("."));
    }

    #[test]
    fn as_of_is_a_calendar_date() {
        let a = parse(&["--payload-dir", "p", "--as-of", "2025-03-15"]);
        assert_eq!(a.as_of, NaiveDate::from_ymd_opt(2025, 3, 15));
        assert!(Args::try_parse_from(["seedlist", "--payload-dir", "p", "--as-of", "15/03/2025"]).is_err());
    }

    #[test]
    fn remote_paths_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path().to_str().unwrap();
        let a = parse(&["--payload-dir", d, "--weight-file", "https://example.org/w.csv"]);
        assert!(matches!(check(a), Err(CliError::NonLocalPath(_))));

        let a = parse(&["--payload-dir", d, "--output-dir", "file:///tmp/out"]);
        assert!(matches!(check(a), Err(CliError::NonLocalPath(_))));
    }

    #[test]
    fn payload_dir_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let a = parse(&["--payload-dir", missing.to_str().unwrap()]);
        assert!(matches!(check(a), Err(CliError::NotFound(_))));

        let d = dir.path().to_str().unwrap();
        assert!(check(parse(&["--payload-dir", d])).is_ok());
    }
}
