//! Tool panel search and filtering
//!
//! Searches a flat tool catalog with weighted exact matching and an
//! approximate fallback, and rebuilds the sectioned panel around the matches.
//! The validity filters prune a panel independently of search.

pub mod backend_query;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod panel;
pub mod render;
pub mod search;
pub mod server;
pub mod worker;

#[cfg(test)]
mod tests_panel_scenarios;

pub use config::SearchConfig;
pub use error::AppError;
pub use panel::{Panel, PanelEntry, Tool, ToolSection};
pub use search::{search_tools, SearchEngine, SearchFieldWeights, SearchResults};
