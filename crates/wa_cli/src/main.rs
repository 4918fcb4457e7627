// crates/wa_cli/src/main.rs
//
// load declaration → resolve target total → apportion → canonical report.
// Every failure is bucketed into one exit code; nothing is retried.

mod args;
mod report;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const ALGO: i32 = 5;
}

use std::io::Write;
use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{parse_and_validate as parse_cli, Args};
use wa_algo::{allocate_detailed, target_total_from_i64, AllocError, ErrorKind};
use wa_io::{canonical_json, loader, IoError};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Declaration shape / ids / weights / missing or negative total
    Validation(String),
    /// Read/write/path/limits
    Io(String),
    /// Search budget exhausted or an internal invariant broke
    Algo(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) | MainError::Io(m) | MainError::Algo(m) => f.write_str(m),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("wapportion: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };

    init_tracing(args.quiet);

    let rc = match run_once(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("wapportion: error: {e}");
            map_error(&e)
        }
    };

    ExitCode::from(rc as u8)
}

/// Logs go to stderr so stdout stays a clean report. RUST_LOG overrides the default level.
fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Algo(_) => ALGO,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { .. } | IoError::Invalid(_) => MainError::Validation(e.to_string()),
        IoError::Path(_) | IoError::Limit(_) => MainError::Io(e.to_string()),
    }
}

fn map_alloc_err(e: AllocError) -> MainError {
    match e.kind() {
        ErrorKind::InvalidArgument => MainError::Validation(e.to_string()),
        ErrorKind::Exhausted | ErrorKind::Internal => MainError::Algo(e.to_string()),
    }
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let loaded = loader::load_declaration(&args.input).map_err(map_io_err)?;
    let decl = &loaded.declaration;

    let target_total = match args.total {
        Some(n) => target_total_from_i64(n).map_err(map_alloc_err)?,
        None => decl.target_total.ok_or_else(|| {
            MainError::Validation("no target total: pass --total or set target_total in the declaration".into())
        })?,
    };

    let outcome =
        allocate_detailed(&decl.categories, target_total, args.search_limits()).map_err(map_alloc_err)?;

    info!(
        input = %args.input.display(),
        categories = decl.categories.len(),
        target_total,
        path = %outcome.path,
        deviation = ?outcome.deviation,
        nodes = outcome.search.nodes_expanded,
        "apportioned"
    );

    let report = report::build_report(&outcome, target_total, &loaded.input_sha256);
    match &args.out {
        Some(out) => canonical_json::write_canonical_file(out, &report).map_err(map_io_err)?,
        None => {
            let mut bytes = canonical_json::to_canonical_json_bytes(&report).map_err(map_io_err)?;
            bytes.push(b'\n');
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| stdout.flush())
                .map_err(|e| MainError::Io(format!("stdout: {e}")))?;
        }
    }
    Ok(())
}
