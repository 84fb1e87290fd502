//! Weighted exact matcher
//!
//! Scans each tool's weighted fields in order and records the first field
//! whose sanitized value contains the sanitized query.

use super::ranking::SearchMatch;
use super::sanitize::{literal_pattern, normalize, sanitize, words};
use super::sections::candidate_sections;
use super::weights::{SearchFieldWeights, COMBINED};
use crate::config::SearchConfig;
use crate::panel::Tool;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

/// A query prepared once per search
#[derive(Debug, Clone)]
pub struct QueryTerms {
    /// Normalized whole query, unescaped
    pub normalized: String,
    /// Distinct normalized query words, in query order
    pub words: Vec<String>,
    pattern: Option<Regex>,
}

impl QueryTerms {
    pub fn new(query: &str, config: &SearchConfig) -> Self {
        let normalized = normalize(query, &config.replacements);
        let pattern = literal_pattern(&sanitize(query, &config.replacements));

        let mut seen = HashSet::new();
        let words = words(query, &config.replacements)
            .into_iter()
            .filter(|w| seen.insert(w.clone()))
            .collect();

        Self {
            normalized,
            words,
            pattern,
        }
    }

    /// Length of the normalized query in grapheme clusters
    pub fn len(&self) -> usize {
        self.normalized.graphemes(true).count()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Whether a normalized field value contains the query
    pub fn found_in(&self, value: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(value),
            None => value.contains(&self.normalized),
        }
    }

    /// Number of distinct query words that also appear in `field_words`
    pub fn shared_words(&self, field_words: &[String]) -> usize {
        self.words
            .iter()
            .filter(|word| field_words.contains(word))
            .count()
    }
}

/// Raw text of a weighted field; `combined` is `name + " " + description`
pub(crate) fn field_text<'a>(tool: &'a Tool, key: &str) -> Option<Cow<'a, str>> {
    if key == COMBINED {
        return Some(Cow::Owned(format!(
            "{} {}",
            tool.name.trim(),
            tool.description.trim()
        )));
    }
    tool.field(key)
}

/// Score one tool, returning the rank of its first qualifying field
fn score_tool(
    tool: &Tool,
    weights: &SearchFieldWeights,
    query: &QueryTerms,
    config: &SearchConfig,
) -> Option<u32> {
    for (key, rank) in weights.fields() {
        let Some(raw) = field_text(tool, key) else {
            continue;
        };
        let value = normalize(&raw, &config.replacements);

        let mut order = if value == query.normalized {
            weights.exact().unwrap_or(rank)
        } else {
            rank
        };

        if let Some(starts_with) = weights.starts_with() {
            if weights.exact() != Some(order)
                && key == "name"
                && value.starts_with(&query.normalized)
            {
                order = starts_with;
            }
        }

        if query.found_in(&value) {
            trace!(tool = %tool.id, field = key, order, "substring match");
            return Some(order);
        }

        if key == COMBINED {
            if let Some(word_match) = weights.word_match() {
                let field_words = words(&raw, &config.replacements);
                if query.shared_words(&field_words) >= config.min_word_match {
                    trace!(tool = %tool.id, order = word_match, "word overlap match");
                    return Some(word_match);
                }
            }
        }
    }

    None
}

/// Exact pass over the catalog
pub fn exact_matches(
    tools: &[Tool],
    weights: &SearchFieldWeights,
    query: &QueryTerms,
    panel_view: &str,
    config: &SearchConfig,
) -> Vec<SearchMatch> {
    let matches: Vec<SearchMatch> = tools
        .iter()
        .filter_map(|tool| {
            score_tool(tool, weights, query, config).map(|order| SearchMatch {
                id: tool.id.clone(),
                sections: candidate_sections(tool, panel_view, config),
                order,
            })
        })
        .collect();

    debug!(
        "Exact pass matched {} of {} tools for '{}'",
        matches.len(),
        tools.len(),
        query.normalized
    );
    matches
}
