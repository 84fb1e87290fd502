//! Markdown rendering of search results and panels for the CLI

use crate::panel::{Panel, PanelEntry, SectionItem, Tool};
use crate::search::SearchResults;
use std::collections::HashMap;

/// Wrap every case-insensitive occurrence of a query word in `**`.
///
/// Adjacent and overlapping matches merge into one span. Text whose
/// lower-cased form has a different byte length is returned unchanged.
pub fn highlight(text: &str, query: &str) -> String {
    let lower = text.to_lowercase();
    if query.trim().is_empty() || lower.len() != text.len() {
        return text.to_string();
    }

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for term in query.split_whitespace() {
        let term = term.to_lowercase();
        let mut idx = 0usize;
        while let Some(pos) = lower[idx..].find(&term) {
            let start = idx + pos;
            ranges.push((start, start + term.len()));
            idx = start + term.len();
        }
    }

    ranges.retain(|&(s, e)| text.is_char_boundary(s) && text.is_char_boundary(e));
    if ranges.is_empty() {
        return text.to_string();
    }

    ranges.sort_by_key(|r| r.0);
    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (s, e) in ranges {
        match merged.last_mut() {
            Some(last) if s <= last.1 => last.1 = last.1.max(e),
            _ => merged.push((s, e)),
        }
    }

    let mut res = String::with_capacity(text.len() + merged.len() * 4);
    let mut last_idx = 0usize;
    for (s, e) in merged {
        res.push_str(&text[last_idx..s]);
        res.push_str("**");
        res.push_str(&text[s..e]);
        res.push_str("**");
        last_idx = e;
    }
    res.push_str(&text[last_idx..]);
    res
}

fn tool_bullet(tool: &Tool, query: &str) -> String {
    let mut line = format!("- {} `{}`", highlight(&tool.name, query), tool.id);
    if !tool.description.trim().is_empty() {
        line.push_str(&format!(": {}", highlight(tool.description.trim(), query)));
    }
    line.push('\n');
    line
}

fn tool_line(tool_id: &str, tools: &HashMap<&str, &Tool>, query: &str) -> String {
    match tools.get(tool_id) {
        Some(tool) => tool_bullet(tool, query),
        None => format!("- `{}`\n", tool_id),
    }
}

fn push_section_items(md: &mut String, items: &[SectionItem], tools: &HashMap<&str, &Tool>, query: &str) {
    for item in items {
        match item {
            SectionItem::ToolId(id) => md.push_str(&tool_line(id, tools, query)),
            SectionItem::Label(label) => md.push_str(&format!("\n*{}*\n\n", label.text)),
        }
    }
    md.push('\n');
}

fn index(tools: &[Tool]) -> HashMap<&str, &Tool> {
    tools.iter().map(|tool| (tool.id.as_str(), tool)).collect()
}

/// Render a search outcome grouped by result section
pub fn search_markdown(results: &SearchResults, tools: &[Tool], query: &str) -> String {
    if results.results.is_empty() {
        return format!("No tools found for \"{}\".\n", query);
    }

    let tools = index(tools);
    let mut md = String::new();
    md.push_str(&format!("# Search Results · {} tools\n\n", results.results.len()));

    if let Some(term) = &results.closest_term {
        md.push_str(&format!("Did you mean: *{}*?\n\n", term));
    }

    for (_, entry) in results.result_panel.iter() {
        if let PanelEntry::Section(section) = entry {
            md.push_str(&format!("## {}\n\n", section.name));
            push_section_items(&mut md, &section.tools, &tools, query);
        }
    }

    md
}

/// Render a panel in order: sections with their tools, labels, standalone tools
pub fn panel_markdown(panel: &Panel, tools: &[Tool]) -> String {
    let tools = index(tools);
    let mut md = String::new();
    md.push_str(&format!("# Tool Panel · {} entries\n\n", panel.len()));

    for (_, entry) in panel.iter() {
        match entry {
            PanelEntry::Section(section) => {
                md.push_str(&format!("## {}\n\n", section.name));
                push_section_items(&mut md, &section.tools, &tools, "");
            }
            PanelEntry::Label(label) => md.push_str(&format!("### {}\n\n", label.text)),
            PanelEntry::Tool(tool) => {
                md.push_str(&tool_bullet(tool, ""));
                md.push('\n');
            }
        }
    }

    md
}
