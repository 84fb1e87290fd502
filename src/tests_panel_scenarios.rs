//! End-to-end search and filter scenarios over small catalogs

use crate::config::{SearchConfig, DEFAULT_REPLACEMENTS};
use crate::panel::{
    build_panel_view, filter_tool_sections, filter_tools, valid_tool_ids, Panel, PanelEntry,
    SectionItem, Tool, ToolSection, ToolSectionLabel, ValidityOptions,
};
use crate::search::{sanitize, search_tools, SearchFieldWeights};
use std::collections::HashSet;

fn search(tools: &[Tool], weights: &SearchFieldWeights, query: &str) -> crate::search::SearchResults {
    let config = SearchConfig::default();
    let panel = Panel::from_tools(tools);
    search_tools(tools, weights, query, "default", &panel, &config)
}

fn section_tool_ids(panel: &Panel, id: &str) -> Vec<String> {
    panel
        .get(id)
        .and_then(PanelEntry::as_section)
        .map(|section| section.tool_ids().map(String::from).collect())
        .unwrap_or_default()
}

fn all_panel_tool_ids(panel: &Panel) -> HashSet<String> {
    panel.tool_ids().into_iter().map(String::from).collect()
}

fn galaxy_catalog() -> Vec<Tool> {
    vec![
        Tool::new("__ZIP_COLLECTION__", "Zip collection", "into a list of pairs")
            .with_section("collection_operations", "Collection Operations"),
        Tool::new("__FILTER_FAILED_DATASETS__", "Filter Failed Datasets", "from a collection")
            .with_section("collection_operations", "Collection Operations"),
        Tool::new("cat1", "Concatenate", "datasets tail-to-head")
            .with_section("textutil", "Text Manipulation"),
        Tool::new("sort1", "Sort", "data in ascending or descending order")
            .with_section("filter_and_sort", "Filter and Sort"),
        Tool::new("upload1", "Upload File", "from your computer"),
    ]
}

#[test]
fn exact_match_takes_exact_weight() {
    let tools = vec![Tool::new("cat1", "Concatenate", "")];
    let weights = SearchFieldWeights::new().with("exact", 5).with("name", 2);
    let config = SearchConfig::default();
    let terms = crate::search::QueryTerms::new("Concatenate", &config);

    let matches = crate::search::exact_matches(&tools, &weights, &terms, "default", &config);
    assert_eq!(matches[0].order, 5);
}

#[test]
fn prefix_override_on_name() {
    let tools = vec![Tool::new("filter1", "Filter Files", "")];
    let weights = SearchFieldWeights::new().with("startsWith", 4).with("name", 1);
    let config = SearchConfig::default();
    let terms = crate::search::QueryTerms::new("Filter", &config);

    let matches = crate::search::exact_matches(&tools, &weights, &terms, "default", &config);
    assert_eq!(matches[0].order, 4);
}

#[test]
fn word_overlap_matches_both_tools() {
    let tools = vec![
        Tool::new("A", "A", "filter failed datasets"),
        Tool::new("B", "B", "filter empty datasets"),
    ];
    let weights = SearchFieldWeights::new().with("combined", 1).with("wordMatch", 0);

    let results = search(&tools, &weights, "filter datasets");
    assert_eq!(results.results, vec!["A", "B"]);
    assert!(results.closest_term.is_none());
}

#[test]
fn fuzzy_fallback_only_without_exact_results() {
    let tools = galaxy_catalog();
    let weights = SearchFieldWeights::default();

    let results = search(&tools, &weights, "Fillter");
    assert_eq!(results.results, vec!["__FILTER_FAILED_DATASETS__"]);
    assert_eq!(results.closest_term.as_deref(), Some("filter"));

    // Correct spelling matches exactly and leaves no hint
    let results = search(&tools, &weights, "Filter");
    assert!(results.results.contains(&"__FILTER_FAILED_DATASETS__".to_string()));
    assert!(results.closest_term.is_none());
}

#[test]
fn id_directive_short_circuits() {
    let tools = galaxy_catalog();
    let weights = SearchFieldWeights::new().with("description", 9);

    let results = search(&tools, &weights, "id:__ZIP_COLLECTION__");
    assert_eq!(results.results, vec!["__ZIP_COLLECTION__"]);

    let results = search(&tools, &weights, "tool_id:__ZIP_COLLECTION__");
    assert_eq!(results.results, vec!["__ZIP_COLLECTION__"]);

    let results = search(&tools, &SearchFieldWeights::default(), "__ZIP_COLLECTION__");
    assert!(results.results.is_empty());
    assert!(results.result_panel.is_empty());
}

#[test]
fn reconstruction_has_no_orphan_ids() {
    let tools = galaxy_catalog();
    for query in ["collection", "data", "Fillter", "upload", "section:Filter and Sort", "zzz"] {
        let results = search(&tools, &SearchFieldWeights::default(), query);
        let ids: HashSet<String> = results.results.iter().cloned().collect();
        assert_eq!(all_panel_tool_ids(&results.result_panel), ids, "query {query}");
    }
}

#[test]
fn reconstruction_orders_by_rank_then_catalog() {
    let tools = galaxy_catalog();
    let results = search(&tools, &SearchFieldWeights::default(), "collection");

    // "Zip collection" matches on name (3); the filter tool only on description (2)
    assert_eq!(results.results, vec!["__ZIP_COLLECTION__", "__FILTER_FAILED_DATASETS__"]);
    assert_eq!(
        section_tool_ids(&results.result_panel, "collection_operations"),
        vec!["__ZIP_COLLECTION__", "__FILTER_FAILED_DATASETS__"]
    );
}

#[test]
fn ontology_view_groups_by_category() {
    let mut tool = Tool::new("bwa", "BWA", "map reads");
    tool.edam_operations = vec!["operation_3198".into()];
    let tools = vec![tool, Tool::new("sam", "SAMtools view", "reads to BAM")];

    let mut panel = Panel::new();
    panel.insert(
        "operation_3198",
        PanelEntry::Section(ToolSection::new("operation_3198", "Read mapping").with_tools(["bwa"])),
    );
    panel.insert(
        "uncategorized",
        PanelEntry::Section(ToolSection::new("uncategorized", "Uncategorized").with_tools(["sam"])),
    );

    let config = SearchConfig::default();
    let results = search_tools(
        &tools,
        &config.weights,
        "reads",
        "ontology:edam_operation",
        &panel,
        &config,
    );
    assert_eq!(results.results, vec!["bwa", "sam"]);
    assert_eq!(section_tool_ids(&results.result_panel, "operation_3198"), vec!["bwa"]);
    assert_eq!(section_tool_ids(&results.result_panel, "uncategorized"), vec!["sam"]);
}

#[test]
fn validity_filter_with_all_ids_is_identity() {
    let tools = galaxy_catalog();
    let mut panel = Panel::from_tools(&tools);
    if let Some(PanelEntry::Section(section)) = panel.get_mut("textutil") {
        section.tools.insert(
            0,
            SectionItem::Label(ToolSectionLabel {
                id: "joins".into(),
                text: "Joins".into(),
            }),
        );
    }

    let all: HashSet<String> = tools.iter().map(|t| t.id.clone()).collect();
    let filtered = filter_tool_sections(&panel, &all);
    assert_eq!(filtered, panel);
}

#[test]
fn sanitizer_is_idempotent() {
    for input in ["Filter Failed Datasets", "Lift-Over (UCSC)", "  'quoted': \"x\" ", ""] {
        let once = sanitize(input, DEFAULT_REPLACEMENTS);
        assert_eq!(sanitize(&once, DEFAULT_REPLACEMENTS), once);
    }
}

#[test]
fn filter_tools_and_sections_end_to_end() {
    let tools = vec![
        Tool::new("tool1", "Tool 1", "first").with_section("group_1", "Group 1"),
        Tool::new("tool2", "Tool 2", "second").with_section("group_1", "Group 1"),
        Tool::new("tool3", "Tool 3", "third").with_section("group_2", "Group 2"),
    ];
    let panel = Panel::from_tools(&tools);

    let kept: Vec<&str> = filter_tools(&tools, &["tool1", "tool3"])
        .into_iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(kept, vec!["tool1", "tool3"]);

    let valid: HashSet<String> = ["tool1", "tool3"].iter().map(|s| s.to_string()).collect();
    let filtered = filter_tool_sections(&panel, &valid);
    assert_eq!(filtered.len(), 2);
    assert_eq!(section_tool_ids(&filtered, "group_1"), vec!["tool1"]);
    assert_eq!(filtered.get("group_2"), panel.get("group_2"));
}

#[test]
fn panel_view_drops_invalid_tools_and_empty_sections() {
    let mut tools = galaxy_catalog();
    tools[2].hidden = true; // cat1, the only textutil tool
    tools[4].is_workflow_compatible = false; // upload1
    // duplicate name + description of sort1
    tools.push(Tool::new("sort2", "Sort", "data in ascending or descending order"));

    let panel = Panel::from_tools(&tools);
    let view = build_panel_view(&panel, &tools, &ValidityOptions::workflow());

    assert_eq!(
        view.keys().collect::<Vec<_>>(),
        vec!["collection_operations", "filter_and_sort"]
    );
    let valid = valid_tool_ids(&tools, &ValidityOptions::workflow());
    assert!(!valid.contains("sort2"));
    assert!(valid.contains("sort1"));

    let options = ValidityOptions {
        excluded_sections: vec!["collection_operations".into()],
        ..ValidityOptions::default()
    };
    let view = build_panel_view(&panel, &tools, &options);
    assert!(!view.contains_key("collection_operations"));
    assert!(view.contains_key("upload1"));
}

#[test]
fn whitespace_query_matches_every_tool() {
    let tools = galaxy_catalog();
    let results = search(&tools, &SearchFieldWeights::default(), "   ");

    let ids: HashSet<String> = results.results.iter().cloned().collect();
    let expected: HashSet<String> = tools.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, expected);
    assert_eq!(results.results.len(), tools.len());
    assert!(results.closest_term.is_none());
}

#[test]
fn empty_id_directive_matches_every_tool_without_fuzzy() {
    let tools = galaxy_catalog();
    // Description weight must not apply once the directive takes over
    let weights = SearchFieldWeights::new().with("description", 9);

    for query in ["id:", "tool_id:  "] {
        let results = search(&tools, &weights, query);
        let ids: HashSet<String> = results.results.iter().cloned().collect();
        let expected: HashSet<String> = tools.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, expected, "query {query}");
        assert!(results.closest_term.is_none());
        assert_eq!(all_panel_tool_ids(&results.result_panel), expected);
    }
}
