// crates/wa_cli/src/args.rs
//
// Deterministic, offline CLI argument surface.
//
// Rules:
// - No networked paths (reject any scheme:// like http/https/file)
// - --input must be an existing local file
// - --total overrides the declaration's target_total; one of them is required
//   (checked after loading, see main.rs)
// - --max-nodes XOR --unbounded controls the correction search budget

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use wa_algo::SearchLimits;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "wapportion",
    disable_help_subcommand = true,
    about = "Split a target total of units across weighted categories, exactly and as proportionally as possible"
)]
pub struct Args {
    /// Category declaration JSON: {"target_total": N, "categories": [{"id": .., "weight": ..}]}.
    #[arg(long)]
    pub input: PathBuf,

    /// Target total; overrides `target_total` in the declaration.
    #[arg(long, allow_negative_numbers = true)]
    pub total: Option<i64>,

    /// Cap on distinct states visited by the exact-sum correction search.
    #[arg(long, conflicts_with = "unbounded")]
    pub max_nodes: Option<u64>,

    /// Disable the correction search budget.
    #[arg(long)]
    pub unbounded: bool,

    /// Write the canonical JSON report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Only log warnings and errors (RUST_LOG still wins when set).
    #[arg(long)]
    pub quiet: bool,
}

impl Args {
    pub fn search_limits(&self) -> SearchLimits {
        if self.unbounded {
            SearchLimits::unbounded()
        } else {
            self.max_nodes
                .map(SearchLimits::with_max_nodes)
                .unwrap_or_default()
        }
    }
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
    BadValue(&'static str),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            BadValue(s) => write!(f, "invalid value: {s}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

fn validate(mut args: Args) -> Result<Args, CliError> {
    ensure_local_exists(&args.input, "--input")?;
    if let Some(out) = &args.out {
        ensure_local_path(out)?;
    }
    if args.max_nodes == Some(0) {
        return Err(CliError::BadValue("--max-nodes must be at least 1"));
    }

    args.input = normalize_path(&args.input);
    args.out = args.out.take().map(|p| normalize_path(&p));
    Ok(args)
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

/// Ensure a provided path string is local (no scheme); existence is checked separately.
#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

/// Ensure a path is local (no scheme) and exists as a regular file.
fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Best-effort normalization to an absolute path.
/// If canonicalize fails (e.g., path doesn't exist yet), produce an absolute path relative to CWD.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}
