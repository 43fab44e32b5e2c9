//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open (and optionally reset) a store to prove `chirpy_core` wiring.
//! - Print a deterministic summary for quick local sanity checks.

use chirpy_core::{
    core_version, default_log_level, init_logging, JsonRepository, StoreConfig,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "chirpy", version, about = "Inspect a chirpy JSON store")]
struct Args {
    /// Store file to open; created empty when missing.
    #[arg(long, env = "CHIRPY_DB_PATH", default_value = "database.json")]
    db: PathBuf,
    /// Delete the store before opening it.
    #[arg(long)]
    debug: bool,
    /// Absolute directory for rotating log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,
    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("chirpy: {err}");
            return ExitCode::FAILURE;
        }
    }

    let config = StoreConfig::new(&args.db).with_reset_on_open(args.debug);
    // An unusable store is fatal; nothing else can run without it.
    let repo = match JsonRepository::open(&config) {
        Ok(repo) => repo,
        Err(err) => {
            log::error!(
                "event=cli_open module=cli status=error error_kind={:?}",
                err.kind()
            );
            eprintln!("chirpy: cannot open store: {err}");
            return ExitCode::FAILURE;
        }
    };

    match repo.summary() {
        Ok(summary) => {
            println!("chirpy_core version={}", core_version());
            println!("store path={}", repo.path().display());
            println!(
                "store chirps={} users={} revoked_tokens={}",
                summary.posts, summary.users, summary.revoked_tokens
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("chirpy: {err}");
            ExitCode::FAILURE
        }
    }
}
