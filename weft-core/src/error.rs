//! Error types for weft-core.

use thiserror::Error;

/// All errors that can arise while assembling run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty. Raised before any
    /// network call is attempted.
    #[error("required environment variable {name} is not set")]
    MissingVar { name: &'static str },

    /// The repository identifier did not split into an owner/name pair.
    #[error("repository must be 'owner/name', got '{value}'")]
    MalformedRepo { value: String },
}
