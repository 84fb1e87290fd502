//! Result ranking and panel reconstruction
//!
//! Orders matches by rank and rebuilds a panel holding only the matched
//! tools, grouped under clones of the sections they were found in.

use crate::panel::{Panel, PanelEntry, SectionItem, ToolSection};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Id of the synthetic section collecting matched standalone tools
pub const UNSECTIONED_ID: &str = "unsectioned";
pub const UNSECTIONED_NAME: &str = "Unsectioned Tools";
pub const UNSECTIONED_DESCRIPTION: &str =
    "Tools that don't appear under any section in the unsearched panel";

/// A tool accepted by one of the matchers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub id: String,
    /// Section ids to look in; empty means every panel entry
    pub sections: Vec<String>,
    /// Rank of the field that matched; higher first
    pub order: u32,
}

/// Ranked ids and the panel rebuilt around them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedResults {
    /// Matched ids in first-placement order, no duplicates
    pub id_results: Vec<String>,
    pub result_panel: Panel,
}

fn unsectioned_section() -> ToolSection {
    let mut section = ToolSection::new(UNSECTIONED_ID, UNSECTIONED_NAME);
    section.description = Some(UNSECTIONED_DESCRIPTION.to_string());
    section
}

/// Append `tool_id` to the result section `section_id`, creating it from
/// `template` on first use
fn place(result: &mut Panel, section_id: &str, tool_id: &str, template: impl FnOnce() -> ToolSection) {
    if !result.contains_key(section_id) {
        result.insert(section_id, PanelEntry::Section(template()));
    }
    if let Some(PanelEntry::Section(section)) = result.get_mut(section_id) {
        if !section.contains_tool(tool_id) {
            section.tools.push(SectionItem::ToolId(tool_id.to_string()));
        }
    }
}

/// Sort matches by rank and rebuild the panel around them.
///
/// Every id in `id_results` sits in at least one section of `result_panel`
/// and every tool id in `result_panel` is in `id_results`. A match that
/// cannot be located in `panel` is left out of both.
pub fn rank_and_reconstruct(mut matches: Vec<SearchMatch>, panel: &Panel) -> RankedResults {
    // stable: equal ranks keep catalog order
    matches.sort_by(|a, b| b.order.cmp(&a.order));

    let mut result_panel = Panel::new();
    let mut id_results = Vec::new();
    let mut placed = HashSet::new();

    for matched in &matches {
        let candidates: Vec<&str> = if matched.sections.is_empty() {
            panel.keys().collect()
        } else {
            matched.sections.iter().map(String::as_str).collect()
        };

        for section_id in candidates {
            let target = match panel.get(section_id) {
                Some(PanelEntry::Section(section)) if section.contains_tool(&matched.id) => {
                    place(&mut result_panel, section_id, &matched.id, || section.empty_clone());
                    true
                }
                Some(PanelEntry::Tool(tool)) if tool.id == matched.id => {
                    place(&mut result_panel, UNSECTIONED_ID, &matched.id, unsectioned_section);
                    true
                }
                _ => false,
            };

            if target && placed.insert(matched.id.clone()) {
                id_results.push(matched.id.clone());
            }
        }
    }

    debug!(
        "Placed {} of {} matches into {} sections",
        id_results.len(),
        matches.len(),
        result_panel.len()
    );

    RankedResults {
        id_results,
        result_panel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Tool, ToolSectionLabel};

    fn hit(id: &str, sections: &[&str], order: u32) -> SearchMatch {
        SearchMatch {
            id: id.to_string(),
            sections: sections.iter().map(|s| s.to_string()).collect(),
            order,
        }
    }

    fn section_ids(panel: &Panel, id: &str) -> Vec<String> {
        panel
            .get(id)
            .and_then(PanelEntry::as_section)
            .map(|s| s.tool_ids().map(String::from).collect())
            .unwrap_or_default()
    }

    fn sample_panel() -> Panel {
        let mut panel = Panel::new();
        panel.insert(
            "text",
            PanelEntry::Section(ToolSection::new("text", "Text").with_tools(["cat1", "sort1"])),
        );
        panel.insert(
            "filter",
            PanelEntry::Section(ToolSection::new("filter", "Filter").with_tools(["filter1", "sort1"])),
        );
        panel.insert(
            "heading",
            PanelEntry::Label(ToolSectionLabel {
                id: "heading".into(),
                text: "Misc".into(),
            }),
        );
        panel.insert("upload1", PanelEntry::Tool(Tool::new("upload1", "Upload", "")));
        panel
    }

    #[test]
    fn test_sorted_by_order_descending() {
        let panel = sample_panel();
        let matches = vec![hit("cat1", &["text"], 1), hit("filter1", &["filter"], 3)];
        let ranked = rank_and_reconstruct(matches, &panel);

        assert_eq!(ranked.id_results, vec!["filter1", "cat1"]);
        assert_eq!(ranked.result_panel.keys().collect::<Vec<_>>(), vec!["filter", "text"]);
    }

    #[test]
    fn test_equal_orders_keep_input_order() {
        let panel = sample_panel();
        let matches = vec![hit("sort1", &["text"], 2), hit("cat1", &["text"], 2)];
        let ranked = rank_and_reconstruct(matches, &panel);
        assert_eq!(ranked.id_results, vec!["sort1", "cat1"]);
        assert_eq!(section_ids(&ranked.result_panel, "text"), vec!["sort1", "cat1"]);
    }

    #[test]
    fn test_empty_sections_search_whole_panel() {
        let panel = sample_panel();
        let ranked = rank_and_reconstruct(vec![hit("sort1", &[], 1)], &panel);

        // sort1 lives in two sections; it is placed in both but listed once
        assert_eq!(ranked.id_results, vec!["sort1"]);
        assert_eq!(section_ids(&ranked.result_panel, "text"), vec!["sort1"]);
        assert_eq!(section_ids(&ranked.result_panel, "filter"), vec!["sort1"]);
    }

    #[test]
    fn test_standalone_tool_goes_to_unsectioned() {
        let panel = sample_panel();
        let ranked = rank_and_reconstruct(vec![hit("upload1", &[], 4)], &panel);

        assert_eq!(ranked.id_results, vec!["upload1"]);
        let section = ranked
            .result_panel
            .get(UNSECTIONED_ID)
            .and_then(PanelEntry::as_section)
            .unwrap();
        assert_eq!(section.name, UNSECTIONED_NAME);
        assert_eq!(section.description.as_deref(), Some(UNSECTIONED_DESCRIPTION));
        assert_eq!(section.tool_ids().collect::<Vec<_>>(), vec!["upload1"]);
    }

    #[test]
    fn test_cloned_section_keeps_metadata_only() {
        let mut panel = sample_panel();
        if let Some(PanelEntry::Section(section)) = panel.get_mut("text") {
            section.description = Some("Text tools".into());
        }
        let ranked = rank_and_reconstruct(vec![hit("cat1", &["text"], 1)], &panel);
        let section = ranked.result_panel.get("text").and_then(PanelEntry::as_section).unwrap();
        assert_eq!(section.name, "Text");
        assert_eq!(section.description.as_deref(), Some("Text tools"));
        assert_eq!(section.tool_ids().collect::<Vec<_>>(), vec!["cat1"]);
    }

    #[test]
    fn test_unlocatable_match_dropped_from_both() {
        let panel = sample_panel();
        let ranked = rank_and_reconstruct(
            vec![hit("ghost", &["text"], 5), hit("cat1", &["text"], 1)],
            &panel,
        );
        assert_eq!(ranked.id_results, vec!["cat1"]);
        assert!(ranked.result_panel.get("unsectioned").is_none());
    }

    #[test]
    fn test_unmatched_sections_omitted() {
        let panel = sample_panel();
        let ranked = rank_and_reconstruct(vec![hit("cat1", &[], 1)], &panel);
        assert_eq!(ranked.result_panel.keys().collect::<Vec<_>>(), vec!["text"]);
        assert!(rank_and_reconstruct(Vec::new(), &panel).result_panel.is_empty());
    }
}
