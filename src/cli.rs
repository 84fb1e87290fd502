//! CLI mode implementation
//!
//! Provides the command-line interface over catalog and panel JSON files

use crate::backend_query::{build_backend_query, parse_filter};
use crate::catalog::{load_panel, load_tools};
use crate::config::{load_weights, SearchConfig};
use crate::error::AppError;
use crate::panel::{build_panel_view, Panel, Tool, ValidityOptions};
use crate::render;
use crate::search::search_tools;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// Tool panel search CLI
#[derive(Parser, Debug)]
#[command(name = "toolpanel")]
#[command(about = "Search and filter a tool panel catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Configuration file (JSON)
    #[arg(long, global = true, env = "TOOLPANEL_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the catalog and print matching tools grouped by section
    Search(SearchArgs),
    /// Print the panel after validity filtering
    Panel(PanelArgs),
    /// Print the full-text backend query for a set of filters
    BackendQuery(BackendQueryArgs),
    /// Serve search requests as JSON lines on stdin/stdout
    Serve,
}

/// Search command arguments
#[derive(Parser, Clone, Debug)]
pub struct SearchArgs {
    /// Tool catalog (JSON array)
    #[arg(short = 't', long)]
    pub tools: PathBuf,

    /// Panel (JSON object); derived from the catalog when omitted
    #[arg(short = 'p', long)]
    pub panel: Option<PathBuf>,

    /// Search terms, or `id:<tool id>` / `section:<section name>`
    #[arg(short = 'q', long)]
    pub query: String,

    /// Panel view (`default` or `ontology:<kind>`)
    #[arg(long)]
    pub view: Option<String>,

    /// Field weights (JSON object) overriding the configured ones
    #[arg(short = 'w', long)]
    pub weights: Option<PathBuf>,

    /// Print the raw JSON result instead of Markdown
    #[arg(long)]
    pub json: bool,
}

/// Panel command arguments
#[derive(Parser, Clone, Debug)]
pub struct PanelArgs {
    /// Tool catalog (JSON array)
    #[arg(short = 't', long)]
    pub tools: PathBuf,

    /// Panel (JSON object); derived from the catalog when omitted
    #[arg(short = 'p', long)]
    pub panel: Option<PathBuf>,

    /// Only keep workflow-compatible tools
    #[arg(long)]
    pub workflow: bool,

    /// Section id to exclude (repeatable)
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Print the panel as JSON instead of Markdown
    #[arg(long)]
    pub json: bool,
}

/// Backend query command arguments
#[derive(Parser, Clone, Debug)]
pub struct BackendQueryArgs {
    /// Filter as KEY=VALUE (repeatable, order kept)
    #[arg(short = 'f', long = "filter", value_parser = parse_filter, required = true)]
    pub filters: Vec<(String, String)>,
}

fn panel_or_default(path: Option<&Path>, tools: &[Tool]) -> Result<Panel, AppError> {
    match path {
        Some(path) => load_panel(path),
        None => Ok(Panel::from_tools(tools)),
    }
}

/// Execute the search command
pub fn run_search(args: &SearchArgs, config: &SearchConfig) -> Result<String, AppError> {
    if args.query.trim().is_empty() {
        return Err(AppError::InvalidInput("Query must not be empty".to_string()));
    }

    let tools = load_tools(&args.tools)?;
    let panel = panel_or_default(args.panel.as_deref(), &tools)?;
    let weights = match &args.weights {
        Some(path) => load_weights(path)?,
        None => config.weights.clone(),
    };
    let view = args.view.as_deref().unwrap_or(&config.default_panel_view);

    let results = search_tools(&tools, &weights, &args.query, view, &panel, config);
    info!("Found {} tools for '{}'", results.results.len(), args.query);

    if args.json {
        Ok(serde_json::to_string_pretty(&results)?)
    } else {
        Ok(render::search_markdown(&results, &tools, &args.query))
    }
}

/// Execute the panel command
pub fn run_panel(args: &PanelArgs) -> Result<String, AppError> {
    let tools = load_tools(&args.tools)?;
    let panel = panel_or_default(args.panel.as_deref(), &tools)?;
    let options = ValidityOptions {
        workflow_only: args.workflow,
        excluded_sections: args.exclude.clone(),
    };

    let view = build_panel_view(&panel, &tools, &options);
    if args.json {
        Ok(serde_json::to_string_pretty(&view)?)
    } else {
        Ok(render::panel_markdown(&view, &tools))
    }
}

pub fn run_backend_query(args: &BackendQueryArgs) -> String {
    build_backend_query(&args.filters)
}
