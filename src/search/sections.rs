//! Candidate section resolution for a matched tool
//!
//! Narrows which panel entries the reconstructor has to inspect. An empty
//! result means "search the whole panel".

use crate::config::SearchConfig;
use crate::panel::Tool;

/// Section id used in ontology views for tools without categories
pub const UNCATEGORIZED: &str = "uncategorized";

const TOOL_PREFIX: &str = "tool_";

pub fn candidate_sections(tool: &Tool, panel_view: &str, config: &SearchConfig) -> Vec<String> {
    if panel_view == config.default_panel_view {
        return match tool.panel_section_id.as_deref() {
            Some(id) if !id.is_empty() => {
                vec![id.strip_prefix(TOOL_PREFIX).unwrap_or(id).to_string()]
            }
            _ => Vec::new(),
        };
    }

    let Some((_, kind)) = panel_view.split_once(':') else {
        return Vec::new();
    };
    if !config.ontology_kinds.iter().any(|k| k == kind) {
        return Vec::new();
    }

    match tool.categories(kind) {
        Some(categories) if !categories.is_empty() => categories.to_vec(),
        _ => vec![UNCATEGORIZED.to_string()],
    }
}
