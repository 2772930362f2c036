//! wsecho — interactive WebSocket echo client.
//!
//! Opens one WebSocket connection on demand, sends what the user types, and
//! shows a running transcript of sent and received text.

mod app;
mod config;
mod input;
mod terminal;
mod view;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

/// wsecho — WebSocket echo client
#[derive(Parser)]
#[command(name = "wsecho", version, about = "Interactive WebSocket echo client")]
struct Cli {
    /// WebSocket endpoint (ws:// or wss://), overrides the config file
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Connect immediately instead of waiting for Ctrl+T
    #[arg(short, long)]
    connect: bool,

    /// Config file path
    #[arg(long = "config")]
    config: Option<String>,

    /// Log file path
    #[arg(long = "log-file")]
    log_file: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config and endpoint errors surface before the subscriber exists.
    if let Err(e) = run(cli).await {
        eprintln!("wsecho: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_path);
    let cfg = config::Config::load(&config_path)?;

    let endpoint = cfg.endpoint(cli.endpoint.as_deref());
    wsecho_client::validate_endpoint(&endpoint)?;

    init_tracing(&cfg.log_file(cli.log_file.as_deref()), cli.verbose)?;

    let connect_now = cli.connect || cfg.connection.auto_connect;
    app::run(endpoint, connect_now)
        .await
        .inspect_err(|e| error!("{e:#}"))
}

/// Send logs to `path`; the terminal belongs to the UI.
fn init_tracing(path: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = if verbose {
        "wsecho=debug,wsecho_cli=debug,wsecho_client=debug"
    } else {
        "wsecho=info,wsecho_cli=info,wsecho_client=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(verbose)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_flags() {
        let cli = Cli::parse_from(["wsecho", "-e", "ws://localhost:9000", "-c", "-v"]);
        assert_eq!(cli.endpoint.as_deref(), Some("ws://localhost:9000"));
        assert!(cli.connect);
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }
}
