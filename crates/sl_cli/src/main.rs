// crates/sl_cli/src/main.rs
//
// Exit codes, typed error mapping, logging init, the validate-only
// short-circuit, and the full offline run:
// config → weights → cached collaborators → pipeline → seed_<N>.{json,csv}.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const PIPELINE: i32 = 5;
}

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args};
use chrono::Utc;
use sl_core::Params;
use sl_io::cache::PayloadCache;
use sl_io::manifest::{self, default_list_sources, ListSource, RunManifest};
use sl_io::weights::{load_weights, WeightMap};
use sl_pipeline::{run_with_sources, CachedSources, PipelineError, RunConfig, Sources};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Manifest shape, parameter domains, weight file shape
    Validation(String),
    /// Read/write/path failures
    Io(String),
    /// Collaborator or stage failures inside the run
    Pipeline(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Pipeline(m) => write!(f, "pipeline: {m}"),
        }
    }
}

/// Effective configuration after manifest + flags are merged.
struct Effective {
    params: Params,
    lists: Vec<ListSource>,
    weights: WeightMap,
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("seedlist: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    init_tracing(args.quiet);

    let rc = match load_effective(&args).and_then(|eff| {
        if args.validate_only {
            info!(
                lists = eff.lists.len(),
                weights = eff.weights.len(),
                goat_limit = eff.params.goat_limit,
                seed_limit = eff.params.seed_limit,
                remainder_budget = eff.params.remainder_budget(),
                "validate-only: inputs OK"
            );
            Ok(())
        } else {
            run_once(&args, eff)
        }
    }) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("seedlist: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Pipeline(_) => PIPELINE,
    }
}

fn map_io_err(e: sl_io::IoError) -> MainError {
    use sl_io::IoError::*;
    match e {
        Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        Manifest(m) => MainError::Validation(format!("manifest: {m}")),
        Invalid(m) => MainError::Validation(m),
        Csv(m) => MainError::Validation(format!("csv: {m}")),
        Path(m) => MainError::Io(format!("path: {m}")),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Validate(m) => MainError::Validation(m),
        PipelineError::Io(m) => MainError::Io(m),
        other => MainError::Pipeline(other.to_string()),
    }
}

/// Manifest (optional) → params with flag overrides → lists → weights.
fn load_effective(args: &Args) -> Result<Effective, MainError> {
    let (man, base_dir) = match &args.manifest {
        Some(p) => (manifest::load_manifest(p).map_err(map_io_err)?, parent_dir(p)),
        None => (RunManifest::default(), PathBuf::from(".")),
    };

    let params = args.apply_overrides(man.params.clone().unwrap_or_default());
    params
        .validate_domains()
        .map_err(|e| MainError::Validation(format!("parameter domain error: {e}")))?;

    let lists = if args.manifest.is_some() { man.list_sources() } else { default_list_sources() };

    let weight_path = args.weight_file.clone().or_else(|| man.weight_path(&base_dir));
    let weights = load_weights(weight_path.as_deref()).map_err(map_io_err)?;
    if let Some(p) = &weight_path {
        let digest = sl_io::hasher::sha256_file(p).map_err(map_io_err)?;
        info!(path = %p.display(), rows = weights.len(), sha256 = %digest, "weights loaded");
        if weights.is_empty() {
            warn!(path = %p.display(), "weight file has no usable rows");
        }
    }

    Ok(Effective { params, lists, weights })
}

fn parent_dir(p: &Path) -> PathBuf {
    match p.parent() {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn run_once(args: &Args, eff: Effective) -> Result<(), MainError> {
    let now = Utc::now();
    let seed_limit = eff.params.seed_limit;
    let cfg = RunConfig {
        params: eff.params,
        lists: eff.lists,
        weights: eff.weights,
        as_of: args.as_of.unwrap_or_else(|| now.date_naive()),
        generated_at: now,
    };

    let cache = PayloadCache::new(&args.payload_dir).with_writes(args.save_cache);
    let sources = CachedSources::new(cache);
    let out = run_with_sources(&cfg, Sources::all(&sources)).map_err(map_pipeline_err)?;

    if !out.fetch_failures.is_empty() {
        warn!(failures = out.fetch_failures.len(), "candidates scored 0 after counter failures");
    }
    if !out.lists_skipped.is_empty() {
        warn!(lists = ?out.lists_skipped, "consensus lists skipped");
    }

    let paths = sl_report::write_outputs(&out.doc, &args.output_dir, seed_limit)
        .map_err(|e| MainError::Io(e.to_string()))?;

    let summary = sl_report::summarize(&out.doc);
    info!(%summary, json = %paths.json.display(), csv = %paths.csv.display(), "done");
    println!("{summary}");
    Ok(())
}
