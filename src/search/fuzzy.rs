//! Approximate matching with Damerau-Levenshtein distance
//!
//! Used only when the exact pass finds nothing. For each `name` or
//! `description` field, looks for a substring of the field within
//! `query_len / 5` edits of the query. Lengths are measured in grapheme
//! clusters so multi-byte text is windowed safely.

use super::exact::{field_text, QueryTerms};
use super::ranking::SearchMatch;
use super::sanitize::{normalize, words};
use super::sections::candidate_sections;
use super::weights::SearchFieldWeights;
use crate::config::SearchConfig;
use crate::panel::Tool;
use std::collections::HashSet;
use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

/// Fields the approximate matcher may consult
const FUZZY_FIELDS: &[&str] = &["name", "description"];

/// Result of the approximate pass
#[derive(Debug, Clone, Default)]
pub struct FuzzyOutcome {
    pub matches: Vec<SearchMatch>,
    /// Shortest whole word containing an accepted substring, across all tools
    pub closest_term: Option<String>,
}

/// Optimal string alignment distance: insertions, deletions, substitutions
/// and adjacent transpositions each cost 1
pub fn damerau_levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let (n, m) = (a.len(), b.len());
    if n == 0 {
        return m;
    }
    if m == 0 {
        return n;
    }

    let mut d = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in d[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=n {
        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            d[i][j] = (d[i - 1][j] + 1)
                .min(d[i][j - 1] + 1)
                .min(d[i - 1][j - 1] + cost);

            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                d[i][j] = d[i][j].min(d[i - 2][j - 2] + 1);
            }
        }
    }

    d[n][m]
}

/// Distance between two strings, per grapheme cluster
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<&str> = a.graphemes(true).collect();
    let b: Vec<&str> = b.graphemes(true).collect();
    damerau_levenshtein(&a, &b)
}

/// Candidate windows `(start, end)` over a value of `len` graphemes, in
/// generation order, duplicates removed.
///
/// 1. length `query_len`, start shifted from `-max_distance` to
///    `len - query_len + max_distance`, clamped to the value
/// 2. length `query_len - max_distance`, when `query_len > 1`
/// 3. length `query_len + max_distance`, when the value is longer than the query
fn candidate_windows(len: usize, query_len: usize, max_distance: usize) -> Vec<(usize, usize)> {
    let mut windows = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |start: usize, end: usize| {
        if start < end && seen.insert((start, end)) {
            windows.push((start, end));
        }
    };

    let (len_i, query_i, max_i) = (len as isize, query_len as isize, max_distance as isize);
    for start in -max_i..=(len_i - query_i + max_i) {
        let end = (start + query_i).clamp(0, len_i) as usize;
        push(start.max(0) as usize, end);
    }

    let mut fixed_width = |width: usize| {
        if width > 0 && width <= len {
            for start in 0..=(len - width) {
                push(start, start + width);
            }
        }
    };

    if query_len > 1 {
        fixed_width(query_len - max_distance);
    }
    if len > query_len {
        fixed_width(query_len + max_distance);
    }

    windows
}

/// First substring of `value` within `query.len() / 5` edits of `query`
pub fn closest_substring(value: &str, query: &str) -> Option<String> {
    let value_g: Vec<&str> = value.graphemes(true).collect();
    let query_g: Vec<&str> = query.graphemes(true).collect();
    if query_g.is_empty() {
        return None;
    }

    let max_distance = query_g.len() / 5;
    candidate_windows(value_g.len(), query_g.len(), max_distance)
        .into_iter()
        .find(|&(start, end)| damerau_levenshtein(&query_g, &value_g[start..end]) <= max_distance)
        .map(|(start, end)| value_g[start..end].concat())
}

/// Approximate pass over the catalog
pub fn fuzzy_matches(
    tools: &[Tool],
    weights: &SearchFieldWeights,
    query: &QueryTerms,
    panel_view: &str,
    config: &SearchConfig,
) -> FuzzyOutcome {
    let mut outcome = FuzzyOutcome::default();
    if query.len() < config.min_fuzzy_length {
        return outcome;
    }

    for tool in tools {
        for (key, rank) in weights.fields() {
            if !FUZZY_FIELDS.contains(&key) {
                continue;
            }
            let Some(raw) = field_text(tool, key) else {
                continue;
            };
            let value = normalize(&raw, &config.replacements);
            let Some(substring) = closest_substring(&value, &query.normalized) else {
                continue;
            };

            trace!(tool = %tool.id, field = key, %substring, "approximate match");
            let term = words(&raw, &config.replacements)
                .into_iter()
                .find(|word| word.contains(&substring));
            if let Some(term) = term {
                let shorter = outcome
                    .closest_term
                    .as_ref()
                    .map_or(true, |best| term.graphemes(true).count() < best.graphemes(true).count());
                if shorter {
                    outcome.closest_term = Some(term);
                }
            }

            outcome.matches.push(SearchMatch {
                id: tool.id.clone(),
                sections: candidate_sections(tool, panel_view, config),
                order: rank,
            });
            break;
        }
    }

    debug!(
        "Approximate pass matched {} tools, closest term {:?}",
        outcome.matches.len(),
        outcome.closest_term
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damerau_levenshtein_distance() {
        assert_eq!(edit_distance("filter", "filter"), 0);
        assert_eq!(edit_distance("fillter", "filter"), 1);
        assert_eq!(edit_distance("test", "tset"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn test_closest_substring_misspelling() {
        assert_eq!(
            closest_substring("filterfaileddatasets", "fillter"),
            Some("filter".to_string())
        );
    }

    #[test]
    fn test_closest_substring_transposition() {
        assert_eq!(edit_distance("concatneate", "concatenate"), 1);

        // Eleven graphemes allow two edits; the clamped leading window is accepted first
        let found = closest_substring("concatenatedatasets", "concatneate").unwrap();
        assert_eq!(found, "concatenat");
        assert!(edit_distance(&found, "concatneate") <= 2);
    }

    #[test]
    fn test_closest_substring_none() {
        assert_eq!(closest_substring("sortdata", "bowtie"), None);
        assert_eq!(closest_substring("anything", ""), None);
    }

    #[test]
    fn test_windows_cover_edges_and_dedupe() {
        let windows = candidate_windows(8, 5, 1);
        assert_eq!(windows.first(), Some(&(0, 4)));
        assert!(windows.contains(&(4, 8)));
        assert!(windows.contains(&(2, 8)));
        let unique: HashSet<_> = windows.iter().collect();
        assert_eq!(unique.len(), windows.len());
    }

    #[test]
    fn test_windows_value_shorter_than_query() {
        // Only clamped and shortened windows fit
        let windows = candidate_windows(4, 5, 1);
        assert!(windows.iter().all(|&(s, e)| e <= 4 && s < e));
        assert!(windows.contains(&(0, 4)));
    }

    #[test]
    fn test_fuzzy_matches_closest_term() {
        let config = SearchConfig::default();
        let tools = vec![
            Tool::new("filter_failed", "Filter Failed Datasets", "from a collection"),
            Tool::new("sort1", "Sort", "data in ascending order"),
        ];
        let terms = QueryTerms::new("Fillter", &config);
        let outcome = fuzzy_matches(&tools, &config.weights, &terms, "default", &config);

        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].id, "filter_failed");
        assert_eq!(outcome.matches[0].order, 3);
        assert_eq!(outcome.closest_term.as_deref(), Some("filter"));
    }

    #[test]
    fn test_fuzzy_requires_minimum_length() {
        let config = SearchConfig::default();
        let tools = vec![Tool::new("sort1", "Sort", "")];
        let terms = QueryTerms::new("srot", &config);
        let outcome = fuzzy_matches(&tools, &config.weights, &terms, "default", &config);
        assert!(outcome.matches.is_empty());
        assert!(outcome.closest_term.is_none());
    }

    #[test]
    fn test_fuzzy_ignores_other_fields() {
        let config = SearchConfig::default();
        let mut tool = Tool::new("t", "Zzz", "");
        tool.help = Some("Concatenate".into());
        let weights = SearchFieldWeights::new().with("help", 5);
        let terms = QueryTerms::new("concatenat", &config);
        let outcome = fuzzy_matches(&[tool], &weights, &terms, "default", &config);
        assert!(outcome.matches.is_empty());
    }
}
