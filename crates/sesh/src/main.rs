//! sesh - inspect and manage sessions stored in Redis
//!
//! Main entry point for the sesh CLI.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

mod commands;
mod values;

use commands::{config, ping, session};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// sesh - inspect and manage sessions stored in Redis
#[derive(Parser)]
#[command(name = "sesh")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Redis URL, overriding config files and SESH_REDIS_URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Key prefix, overriding config files and SESH_REDIS_PREFIX
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// User config directory (default: SESH_CONFIG_DIR or the platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Also write JSON logs to a daily rotating file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the Redis server answers
    Ping(ping::PingArgs),

    /// Session value operations
    #[command(flatten)]
    Session(session::SessionCommand),

    /// Configuration inspection
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = init_tracing(cli.verbose, cli.log_dir.as_deref());

    let loaded = sesh_config::load_config_with_options(None, cli.config_dir.as_deref())
        .context("failed to load configuration")?;
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    let mut config = loaded.config.clone();
    if cli.url.is_some() || cli.prefix.is_some() {
        let mut redis = config.redis();
        if let Some(url) = cli.url {
            redis.url = url;
        }
        if let Some(prefix) = cli.prefix {
            redis.prefix = prefix;
        }
        config.redis = Some(redis);
    }

    let ctx = commands::Context {
        config,
        loaded,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Ping(args) => ping::run(args, &ctx),
        Commands::Session(command) => session::run(command, &ctx),
        Commands::Config(args) => config::run(args, &ctx),
    }
}

/// Console logs on stderr, plus an optional JSON file log.
fn init_tracing(
    verbose: bool,
    log_dir: Option<&std::path::Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose {
        "sesh=debug,sesh_session=debug,sesh_backend=debug,sesh_config=debug,info"
    } else {
        "sesh=info,sesh_session=warn,sesh_backend=warn,warn"
    };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let console = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "sesh.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(console)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_filter(EnvFilter::new(
                            "sesh=trace,sesh_session=trace,sesh_backend=trace,sesh_config=trace,info",
                        )),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(console).init();
            None
        }
    }
}
