//! JSON-string escaping for variable values.
//!
//! The persistence path delegates this to `serde_json`; `escape_value` is
//! the same transformation applied by hand, used to flatten values onto one
//! line for reporting. The replacement order is load-bearing: backslashes
//! first, then quotes, then newlines — anything else double-escapes.

/// Escape `raw` for embedding in a JSON string literal: `\` → `\\`,
/// `"` → `\"`, newline → the two characters `\n`.
pub fn escape_value(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
