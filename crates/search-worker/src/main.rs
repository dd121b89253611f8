//! search-worker - answers chess search jobs over stdin/stdout.
//!
//! Each stdin line is one JSON job; each job gets exactly one JSON line on
//! stdout, including lines that are not UTF-8 or not JSON. Logs go to stderr.

use clap::Parser;
use search_worker::{Worker, WorkerConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Answers chess search jobs read from stdin, one JSON object per line.
#[derive(Parser)]
#[command(name = "search-worker")]
#[command(about = "Answers chess search jobs read from stdin")]
struct Args {
    /// Path to a TOML config file (default: search-worker.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level used for jobs that do not carry one (1-5)
    #[arg(long)]
    level: Option<u8>,

    /// Seed for the tie-break between equally scored moves
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (mut config, source) = WorkerConfig::load(args.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_deref().unwrap_or("info")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match &source {
        Some(path) => tracing::info!("Loaded config from {}", path.display()),
        None => tracing::info!("No config file found, using defaults"),
    }

    if let Some(level) = args.level {
        config.default_level = level;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    tracing::info!(
        default_level = config.default_level,
        max_level = config.max_level,
        seed = ?config.seed,
        "Starting search-worker"
    );

    let mut worker = Worker::from_config(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    let mut input = stdin.lock();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }
        let response = worker.handle_bytes(line);
        serde_json::to_writer(&mut stdout, &response)?;
        writeln!(stdout)?;
        stdout.flush()?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
