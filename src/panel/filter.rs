//! Panel validity filters
//!
//! Pure functions that prune a panel by tool validity. None of them mutate
//! their input; touched sections are copied, untouched entries are cloned.

use super::types::{Panel, PanelEntry, SectionItem, Tool};
use std::collections::HashSet;
use tracing::debug;

/// Options for the tool-level validity filter
#[derive(Debug, Clone, Default)]
pub struct ValidityOptions {
    /// Only keep workflow-compatible tools
    pub workflow_only: bool,
    /// Section ids whose tools (and which themselves) are excluded
    pub excluded_sections: Vec<String>,
}

impl ValidityOptions {
    pub fn workflow() -> Self {
        Self {
            workflow_only: true,
            ..Self::default()
        }
    }

    pub fn is_excluded(&self, section_id: Option<&str>) -> bool {
        section_id.is_some_and(|id| self.excluded_sections.iter().any(|s| s == id))
    }
}

/// Deduplicate-and-compatibility filter.
///
/// Keeps tools in catalog order, dropping a tool when its `name + description`
/// duplicates a tool already kept, when it is hidden or disabled, when
/// `workflow_only` is set and it is not workflow compatible, or when its
/// section is excluded.
pub fn valid_tools<'a>(tools: &'a [Tool], options: &ValidityOptions) -> Vec<&'a Tool> {
    let mut seen_texts: HashSet<String> = HashSet::new();
    let mut kept = Vec::new();

    for tool in tools {
        let text = format!("{}{}", tool.name, tool.description);
        if seen_texts.contains(&text) {
            continue;
        }
        if tool.hidden || tool.disabled {
            continue;
        }
        if options.workflow_only && !tool.is_workflow_compatible {
            continue;
        }
        if options.is_excluded(tool.panel_section_id.as_deref()) {
            continue;
        }
        seen_texts.insert(text);
        kept.push(tool);
    }

    debug!("{} of {} tools valid in current view", kept.len(), tools.len());
    kept
}

/// Ids of [`valid_tools`], as a set for membership tests
pub fn valid_tool_ids(tools: &[Tool], options: &ValidityOptions) -> HashSet<String> {
    valid_tools(tools, options)
        .into_iter()
        .map(|tool| tool.id.clone())
        .collect()
}

/// Catalog tools whose id is in `ids`, in catalog order
pub fn filter_tools<'a, S>(tools: &'a [Tool], ids: &[S]) -> Vec<&'a Tool>
where
    S: AsRef<str>,
{
    let wanted: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
    tools
        .iter()
        .filter(|tool| wanted.contains(tool.id.as_str()))
        .collect()
}

/// Per-section tool filter.
///
/// Every section's tool list is reduced to ids in `valid_ids`; labels inside
/// sections stay where they are. Entries without a tool list pass through.
pub fn filter_tool_sections(panel: &Panel, valid_ids: &HashSet<String>) -> Panel {
    panel
        .iter()
        .map(|(id, entry)| {
            let entry = match entry {
                PanelEntry::Section(section) => {
                    let mut filtered = section.empty_clone();
                    filtered.tools = section
                        .tools
                        .iter()
                        .filter(|item| match item {
                            SectionItem::ToolId(tool_id) => valid_ids.contains(tool_id),
                            SectionItem::Label(_) => true,
                        })
                        .cloned()
                        .collect();
                    PanelEntry::Section(filtered)
                }
                other => other.clone(),
            };
            (id.to_string(), entry)
        })
        .collect()
}

/// Panel assembly filter.
///
/// Keeps bare tools present in `valid_ids`, labels, and sections that still
/// hold at least one tool id and are not excluded.
pub fn assemble_panel(
    sections: &Panel,
    valid_ids: &HashSet<String>,
    excluded_sections: &[String],
) -> Panel {
    sections
        .iter()
        .filter(|(id, entry)| match entry {
            PanelEntry::Tool(_) => valid_ids.contains(*id),
            PanelEntry::Label(_) => true,
            PanelEntry::Section(section) => {
                section.tool_ids().next().is_some() && !excluded_sections.iter().any(|s| s == id)
            }
        })
        .map(|(id, entry)| (id.to_string(), entry.clone()))
        .collect()
}

/// Compose the validity pipeline into the panel shown before any search
pub fn build_panel_view(panel: &Panel, tools: &[Tool], options: &ValidityOptions) -> Panel {
    let valid_ids = valid_tool_ids(tools, options);
    let sections = filter_tool_sections(panel, &valid_ids);
    let view = assemble_panel(&sections, &valid_ids, &options.excluded_sections);
    debug!("Panel view has {} of {} entries", view.len(), panel.len());
    view
}
