//! String sanitizer
//!
//! Normalizes query and field text so punctuation differences between the two
//! do not affect matching, and escapes the result for use as a literal pattern.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Characters with special meaning in a regular expression
const REGEX_METACHARACTERS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// NFC, lower-case, trim, then remove each replacement in list order
pub fn normalize<S: AsRef<str>>(text: &str, replacements: &[S]) -> String {
    let mut value = text.nfc().collect::<String>().to_lowercase().trim().to_string();
    for target in replacements {
        let target = target.as_ref();
        if !target.is_empty() {
            value = value.replace(target, "");
        }
    }
    value
}

/// Prefix every regex metacharacter with a backslash
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if REGEX_METACHARACTERS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Full sanitizer: [`normalize`] followed by [`escape`]
pub fn sanitize<S: AsRef<str>>(text: &str, replacements: &[S]) -> String {
    escape(&normalize(text, replacements))
}

/// Whitespace-separated words of `text`, each normalized, empties dropped
pub fn words<S: AsRef<str>>(text: &str, replacements: &[S]) -> Vec<String> {
    text.split_whitespace()
        .map(|word| normalize(word, replacements))
        .filter(|word| !word.is_empty())
        .collect()
}

/// Compile a sanitized value into a literal-match pattern
pub fn literal_pattern(sanitized: &str) -> Option<Regex> {
    Regex::new(sanitized).ok()
}
