//! Search field weights
//!
//! Maps a tool field name, or one of the reserved pseudo-fields, to a rank.
//! Higher ranks win. Insertion order is scan order.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Rank used when the whole sanitized field equals the sanitized query
pub const EXACT: &str = "exact";
/// Rank used when `name` starts with the query
pub const STARTS_WITH: &str = "startsWith";
/// Pseudo-field: `name + " " + description`
pub const COMBINED: &str = "combined";
/// Rank used for word-overlap matches on `combined`
pub const WORD_MATCH: &str = "wordMatch";

/// Weights used when the caller supplies none
pub const DEFAULT_WEIGHTS: &[(&str, u32)] = &[
    (EXACT, 5),
    (STARTS_WITH, 4),
    ("name", 3),
    ("description", 2),
    (COMBINED, 1),
    (WORD_MATCH, 0),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFieldWeights {
    entries: Vec<(String, u32)>,
}

impl Default for SearchFieldWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS.iter().copied().collect()
    }
}

impl SearchFieldWeights {
    /// Empty weights; nothing will match
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Weights consulting a single field, as used by directive searches
    pub fn single(field: &str, rank: u32) -> Self {
        Self::new().with(field, rank)
    }

    /// Builder helper
    pub fn with(mut self, key: &str, rank: u32) -> Self {
        self.insert(key, rank);
        self
    }

    /// Set a rank; an existing key keeps its scan position
    pub fn insert(&mut self, key: &str, rank: u32) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = rank,
            None => self.entries.push((key.to_string(), rank)),
        }
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, rank)| *rank)
    }

    pub fn exact(&self) -> Option<u32> {
        self.get(EXACT)
    }

    pub fn starts_with(&self) -> Option<u32> {
        self.get(STARTS_WITH)
    }

    pub fn word_match(&self) -> Option<u32> {
        self.get(WORD_MATCH)
    }

    /// Scannable fields in insertion order: every key except the rank-only
    /// pseudo-fields `exact`, `startsWith` and `wordMatch`
    pub fn fields(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), EXACT | STARTS_WITH | WORD_MATCH))
            .map(|(k, rank)| (k.as_str(), *rank))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, u32)> for SearchFieldWeights {
    fn from_iter<T: IntoIterator<Item = (&'a str, u32)>>(iter: T) -> Self {
        let mut weights = Self::new();
        for (key, rank) in iter {
            weights.insert(key, rank);
        }
        weights
    }
}

impl Serialize for SearchFieldWeights {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, rank) in &self.entries {
            map.serialize_entry(key, rank)?;
        }
        map.end()
    }
}

struct WeightsVisitor;

impl<'de> Visitor<'de> for WeightsVisitor {
    type Value = SearchFieldWeights;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of field name to non-negative rank")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut weights = SearchFieldWeights::new();
        while let Some((key, rank)) = access.next_entry::<String, u32>()? {
            weights.insert(&key, rank);
        }
        Ok(weights)
    }
}

impl<'de> Deserialize<'de> for SearchFieldWeights {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(WeightsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = SearchFieldWeights::default();
        assert_eq!(weights.exact(), Some(5));
        assert_eq!(weights.starts_with(), Some(4));
        assert_eq!(weights.word_match(), Some(0));
        let fields: Vec<_> = weights.fields().collect();
        assert_eq!(fields, vec![("name", 3), ("description", 2), ("combined", 1)]);
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let weights: SearchFieldWeights =
            serde_json::from_str(r#"{"description": 9, "exact": 10, "name": 1}"#).unwrap();
        let fields: Vec<_> = weights.fields().map(|(k, _)| k).collect();
        assert_eq!(fields, vec!["description", "name"]);
        assert_eq!(weights.exact(), Some(10));
        assert_eq!(weights.starts_with(), None);

        let out = serde_json::to_string(&weights).unwrap();
        assert_eq!(out, r#"{"description":9,"exact":10,"name":1}"#);
    }

    #[test]
    fn test_negative_rank_rejected() {
        assert!(serde_json::from_str::<SearchFieldWeights>(r#"{"name": -1}"#).is_err());
    }

    #[test]
    fn test_single() {
        let weights = SearchFieldWeights::single("id", 1);
        assert_eq!(weights.fields().collect::<Vec<_>>(), vec![("id", 1)]);
        assert_eq!(weights.exact(), None);
    }
}
