//! Scope filtering and prefix stripping for fetched variables.

use weft_core::types::Variable;

/// The name prefix selecting variables for one prefix/environment pair.
pub fn scope_prefix(prefix: &str, environment: &str) -> String {
    format!("{prefix}_{environment}_")
}

/// Keep the `(name, value)` pairs whose name starts with `scope`, stripping
/// exactly that prefix once. Case-sensitive.
pub fn filter_and_strip(scope: &str, fetched: &[(String, String)]) -> Vec<Variable> {
    fetched
        .iter()
        .filter_map(|(name, value)| {
            name.strip_prefix(scope)
                .map(|stripped| Variable::string(stripped, value.clone()))
        })
        .collect()
}
