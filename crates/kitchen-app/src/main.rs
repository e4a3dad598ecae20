mod chat;
mod cli;
mod commands;
mod dotenv;
mod render;

use kitchen_common::{KitchenError, Result};
use kitchen_config::KitchenConfig;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

fn log_directive(level: &str) -> Result<Directive> {
    level
        .parse::<LevelFilter>()
        .map(Directive::from)
        .map_err(|_| {
            KitchenError::Other(format!(
                "invalid log level {level:?} (expected trace, debug, info, warn, error or off)"
            ))
        })
}

fn init_logging(directive: Directive) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
}

/// An explicit `--config` path must load; the default path falls back to
/// defaults with a warning once logging is up.
fn load_config(args: &cli::Args) -> Result<(KitchenConfig, Option<String>)> {
    match args.config {
        Some(ref path) => Ok((kitchen_config::load_config_from(path)?, None)),
        None => Ok(match kitchen_config::load_config() {
            Ok(config) => (config, None),
            Err(e) => (KitchenConfig::default(), Some(e.to_string())),
        }),
    }
}

fn run(args: cli::Args) -> Result<()> {
    let (config, fallback_reason) = load_config(&args)?;

    let level = args
        .log_level
        .as_deref()
        .unwrap_or_else(|| config.logging.level.as_filter());
    init_logging(log_directive(level)?);

    tracing::info!("AI Kitchen v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(reason) = fallback_reason {
        tracing::warn!("Config load failed, using defaults: {reason}");
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(commands::run(args.command, config))
}

fn main() {
    // Load .env file before anything else
    dotenv::load_dotenv();

    let args = cli::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    tracing::info!("Shutdown complete");
}
