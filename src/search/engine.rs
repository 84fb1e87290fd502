//! Search Engine Integration
//!
//! Ties together directive parsing, the exact and approximate matchers, and
//! panel reconstruction.

use super::directive::{Directive, QueryParser};
use super::exact::{exact_matches, QueryTerms};
use super::fuzzy::fuzzy_matches;
use super::ranking::rank_and_reconstruct;
use super::weights::SearchFieldWeights;
use crate::config::SearchConfig;
use crate::panel::{Panel, Tool};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of one search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Matched tool ids, best first
    pub results: Vec<String>,
    /// The current panel reduced to matched tools
    pub result_panel: Panel,
    /// "Did you mean" hint; set only when the approximate matcher accepted a tool
    pub closest_term: Option<String>,
}

/// Run the full pipeline: directive, exact pass, at most one approximate
/// pass, then reconstruction against `current_panel`.
pub fn search_tools(
    tools: &[Tool],
    weights: &SearchFieldWeights,
    query: &str,
    panel_view: &str,
    current_panel: &Panel,
    config: &SearchConfig,
) -> SearchResults {
    let parsed = QueryParser::parse(query, config);

    let directive_weights;
    let weights = match &parsed.directive {
        Some(Directive::ToolId(_)) => {
            directive_weights = SearchFieldWeights::single("id", 1);
            &directive_weights
        }
        Some(Directive::Section(_)) => {
            directive_weights = SearchFieldWeights::single("panel_section_name", 1);
            &directive_weights
        }
        None => weights,
    };

    let terms = QueryTerms::new(parsed.effective_query(), config);
    let mut matches = exact_matches(tools, weights, &terms, panel_view, config);
    let mut closest_term = None;

    if matches.is_empty() && parsed.directive.is_none() && terms.len() >= config.min_fuzzy_length {
        debug!("No exact matches for '{}', trying approximate pass", query);
        let outcome = fuzzy_matches(tools, weights, &terms, panel_view, config);
        matches = outcome.matches;
        closest_term = outcome.closest_term;
    }

    let ranked = rank_and_reconstruct(matches, current_panel);
    SearchResults {
        results: ranked.id_results,
        result_panel: ranked.result_panel,
        closest_term,
    }
}

/// Search engine bound to one configuration
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Search with the configured weights, or `weights` when given
    pub fn search(
        &self,
        tools: &[Tool],
        weights: Option<&SearchFieldWeights>,
        query: &str,
        panel_view: &str,
        current_panel: &Panel,
    ) -> SearchResults {
        let weights = weights.unwrap_or(&self.config.weights);
        search_tools(tools, weights, query, panel_view, current_panel, &self.config)
    }
}
