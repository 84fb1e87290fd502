//! Query directive parser
//!
//! Recognizes `key:value` prefixes that redirect a query to a single tool
//! field instead of the weighted free-text scan.

use crate::config::SearchConfig;

/// A recognized directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `id:` / `tool_id:`, matched against the tool id
    ToolId(String),
    /// `section:`, matched against the tool's panel section name
    Section(String),
}

/// Parsed search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Original unmodified query
    pub original: String,
    /// Directive found in the query, if any
    pub directive: Option<Directive>,
}

impl ParsedQuery {
    /// The text to match: the directive value, or the whole query
    pub fn effective_query(&self) -> &str {
        match &self.directive {
            Some(Directive::ToolId(value)) | Some(Directive::Section(value)) => value,
            None => &self.original,
        }
    }
}

/// Query parser
pub struct QueryParser;

impl QueryParser {
    /// Parse a query using the directive keys from `config`
    pub fn parse(query: &str, config: &SearchConfig) -> ParsedQuery {
        let directive = if let Some(value) = directive_value(query, &config.id_directives) {
            Some(Directive::ToolId(value))
        } else {
            directive_value(query, &[config.section_directive.as_str()]).map(Directive::Section)
        };

        ParsedQuery {
            original: query.to_string(),
            directive,
        }
    }
}

/// Find the earliest `"<key>:"` marker in `query` and return everything
/// after it, trimmed. A marker with nothing after it yields `Some("")`.
pub fn directive_value<S: AsRef<str>>(query: &str, keys: &[S]) -> Option<String> {
    keys.iter()
        .filter_map(|key| {
            let marker = format!("{}:", key.as_ref());
            query.find(&marker).map(|pos| (pos, pos + marker.len()))
        })
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, value_start)| query[value_start..].trim().to_string())
}
