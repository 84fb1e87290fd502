//! Full-text backend query construction
//!
//! Turns a flat list of filter settings into the two-clause query string the
//! indexed search backend expects. The output format is matched byte for
//! byte by the backend, including the trailing `" AND "`.

use crate::error::AppError;

/// Filter key whose value is matched against name and description
pub const NAME_FILTER: &str = "name";

/// Backend field a filter key is sent as
fn backend_field<'a>(key: &'a str, value: &str) -> &'a str {
    match key {
        "ontology" if value.contains("operation") => "edam_operations",
        "ontology" if value.contains("topic") => "edam_topics",
        "id" => "id_exact",
        other => other,
    }
}

/// Build `(<name clause>) AND (<field clauses>)` from filters in order.
///
/// Empty values are skipped. The name clause is empty when no `name` filter
/// is set; every field clause ends with `" AND "`.
pub fn build_backend_query<K, V>(filters: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut query = String::from("(");

    let name = filters
        .iter()
        .find(|(key, value)| key.as_ref() == NAME_FILTER && !value.as_ref().is_empty());
    if let Some((_, value)) = name {
        let value = value.as_ref();
        query.push_str(&format!(
            "name:({value}) name_exact:({value}) description:({value})"
        ));
    }

    query.push_str(") AND (");

    for (key, value) in filters {
        let (key, value) = (key.as_ref(), value.as_ref());
        if value.is_empty() || key == NAME_FILTER {
            continue;
        }
        query.push_str(&format!("{}:({}) AND ", backend_field(key, value), value));
    }

    query.push(')');
    query
}

/// Parse a `KEY=VALUE` filter argument
pub fn parse_filter(arg: &str) -> Result<(String, String), AppError> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| AppError::InvalidInput(format!("Filter must be KEY=VALUE, got '{}'", arg)))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::InvalidInput(format!("Filter key is empty in '{}'", arg)));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
