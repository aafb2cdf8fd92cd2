//! Weft core library — domain types, run configuration, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes, variable-library structs, name derivation
//! - [`config`] — fail-fast environment configuration
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{ProvisionConfig, RepoSlug, ServicePrincipal};
pub use error::ConfigError;
pub use types::{
    workspace_name_for_branch, Variable, VariableLibrary, WorkspaceId, WorkspaceName,
    VARIABLE_LIBRARY_SCHEMA, VARIABLE_TYPE_STRING,
};
