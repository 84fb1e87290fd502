//! toolpanel search worker & CLI
//!
//! Dual-mode application:
//! - Server Mode (default): JSON-line search worker on stdio
//! - CLI Mode: search, filter and query-building commands over JSON files

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use toolpanel_search::cli::{self, Cli, Commands};
use toolpanel_search::config::load_config;
use toolpanel_search::error::AppError;
use toolpanel_search::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Detect mode: CLI if args present, server otherwise
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        run_cli_mode().await
    } else {
        run_server_mode().await
    }
}

/// Run in CLI mode
async fn run_cli_mode() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // stdout carries results
        .init();

    let result = execute(cli).await;

    match result {
        Ok(Some(output)) => {
            println!("{}", output);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(get_exit_code(&e));
        }
    }
}

async fn execute(cli: Cli) -> Result<Option<String>> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Search(args)) => Ok(Some(cli::run_search(&args, &config)?)),
        Some(Commands::Panel(args)) => Ok(Some(cli::run_panel(&args)?)),
        Some(Commands::BackendQuery(args)) => Ok(Some(cli::run_backend_query(&args))),
        Some(Commands::Serve) => {
            server::serve_stdio(config).await?;
            Ok(None)
        }
        None => Err(AppError::InvalidInput(
            "No command specified. Use --help for usage information.".to_string(),
        )
        .into()),
    }
}

/// Map an error to the process exit code
fn get_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::InvalidInput(_)) => 1,
        Some(AppError::ParseFailed(_)) => 2,
        Some(AppError::Io(_)) => 3,
        Some(AppError::Config(_)) => 4,
        _ => 5,
    }
}

/// Run in server mode
async fn run_server_mode() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::var_os("TOOLPANEL_CONFIG").map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;

    info!("Starting toolpanel search server");
    server::serve_stdio(config).await
}
