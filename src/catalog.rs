//! Catalog and panel ingestion from JSON files

use crate::error::AppError;
use crate::panel::{Panel, Tool};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parse a JSON array of tool records
pub fn parse_tools(json: &str) -> Result<Vec<Tool>, AppError> {
    let tools: Vec<Tool> = serde_json::from_str(json)?;
    if let Some(position) = tools.iter().position(|tool| tool.id.is_empty()) {
        return Err(AppError::InvalidInput(format!(
            "Tool at index {} has an empty id",
            position
        )));
    }
    Ok(tools)
}

/// Parse a JSON object of panel entries keyed by id
pub fn parse_panel(json: &str) -> Result<Panel, AppError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_tools(path: &Path) -> Result<Vec<Tool>, AppError> {
    let content = read(path)?;
    let tools = parse_tools(&content)?;
    debug!("Loaded {} tools from {}", tools.len(), path.display());
    Ok(tools)
}

pub fn load_panel(path: &Path) -> Result<Panel, AppError> {
    let content = read(path)?;
    let panel = parse_panel(&content)?;
    debug!("Loaded {} panel entries from {}", panel.len(), path.display());
    Ok(panel)
}

fn read(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path)
        .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))
}
