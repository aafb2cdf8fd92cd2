//! Domain types for the weft variable library and workspace model.
//!
//! The variable library serializes with the exact field names the Fabric
//! valueSet schema expects (`$schema`, `type`); never rename fields here
//! without checking the on-disk format.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `$schema` tag written into every variable-library document.
pub const VARIABLE_LIBRARY_SCHEMA: &str = "https://developer.microsoft.com/json-schemas/fabric/item/variableLibrary/definition/valueSet/1.0.0/schema.json";

/// The only variable type weft produces.
pub const VARIABLE_TYPE_STRING: &str = "String";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed server-assigned workspace identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId(pub String);

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for WorkspaceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkspaceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed workspace display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceName(pub String);

impl fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for WorkspaceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkspaceName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Display name for the workspace serving `branch`: `{prefix}-{branch}` with
/// path separators flattened to hyphens.
pub fn workspace_name_for_branch(prefix: &str, branch: &str) -> WorkspaceName {
    WorkspaceName(format!("{prefix}-{}", branch.replace('/', "-")))
}

// ---------------------------------------------------------------------------
// Variable library
// ---------------------------------------------------------------------------

/// A single entry in a variable library. Identity is `name`; the library
/// enforces name uniqueness at merge time, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub note: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Variable {
    /// A `type: "String"` variable with an empty note.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: String::new(),
            kind: VARIABLE_TYPE_STRING.to_owned(),
            value: value.into(),
        }
    }
}

/// The persisted variable-library document: a schema tag plus an ordered
/// sequence of variables. Read in full, written in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableLibrary {
    #[serde(rename = "$schema")]
    pub schema: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Default for VariableLibrary {
    fn default() -> Self {
        Self {
            schema: VARIABLE_LIBRARY_SCHEMA.to_owned(),
            variables: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
