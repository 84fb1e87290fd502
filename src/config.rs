//! Search configuration
//!
//! Every tunable of the search and filter algorithms lives here and is passed
//! explicitly into the functions that need it.

use crate::error::AppError;
use crate::search::SearchFieldWeights;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Substrings removed from both query and field values before matching
pub const DEFAULT_REPLACEMENTS: &[&str] = &[" ", "-", "(", ")", "'", ":", "\""];
/// Shortest sanitized query that may use the approximate matcher
pub const MIN_FUZZY_LENGTH: usize = 5;
/// Distinct query words that must appear in `combined` for a word match
pub const MIN_WORD_MATCH: usize = 2;
/// Directive keys that redirect the query to the tool id
pub const ID_DIRECTIVES: &[&str] = &["id", "tool_id"];
pub const SECTION_DIRECTIVE: &str = "section";
/// Ontology kinds a `class:kind` panel view may name
pub const ONTOLOGY_KINDS: &[&str] = &["edam_operation", "edam_topic"];
pub const DEFAULT_PANEL_VIEW: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub weights: SearchFieldWeights,
    pub replacements: Vec<String>,
    pub min_fuzzy_length: usize,
    pub min_word_match: usize,
    pub id_directives: Vec<String>,
    pub section_directive: String,
    pub ontology_kinds: Vec<String>,
    pub default_panel_view: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            weights: SearchFieldWeights::default(),
            replacements: to_strings(DEFAULT_REPLACEMENTS),
            min_fuzzy_length: MIN_FUZZY_LENGTH,
            min_word_match: MIN_WORD_MATCH,
            id_directives: to_strings(ID_DIRECTIVES),
            section_directive: SECTION_DIRECTIVE.to_string(),
            ontology_kinds: to_strings(ONTOLOGY_KINDS),
            default_panel_view: DEFAULT_PANEL_VIEW.to_string(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Get the path to the default configuration file
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("toolpanel-search").join("config.json"))
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the default path is used when
/// present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<SearchConfig, AppError> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("No config file, using defaults");
                return Ok(SearchConfig::default());
            }
        },
    };

    let data = fs::read_to_string(&path)
        .map_err(|e| AppError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    let config: SearchConfig = serde_json::from_str(&data)
        .map_err(|e| AppError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load a weights override file (a JSON object of field to rank)
pub fn load_weights(path: &Path) -> Result<SearchFieldWeights, AppError> {
    let data = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&data)
        .map_err(|e| AppError::Config(format!("Invalid weights in {}: {}", path.display(), e)))
}
