//! # weft-api
//!
//! Thin, synchronous REST clients for the services weft talks to:
//!
//! - [`auth`] — Entra ID client-credentials token grant
//! - [`fabric`] — Fabric workspace lookup/create and Git linking
//! - [`github`] — GitHub Actions repository variables
//!
//! Calls are sequential and fail fast: any non-2xx response (bar the
//! recognized idempotent Git-link codes) surfaces as [`ApiError`] and ends
//! the run.

pub mod auth;
pub mod error;
pub mod fabric;
pub mod github;

pub use error::ApiError;
pub use fabric::{EnsureOutcome, FabricClient, GitConnectOutcome, GitLink, Workspace};
pub use github::{GithubClient, RepoVariable};

/// Shared HTTP agent configuration: a hard timeout, nothing else. The
/// timeout is the only cancellation mechanism in the system.
pub(crate) fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(std::time::Duration::from_secs(30))
        .build()
}

/// Strip a trailing `/` so path joins never produce `//`.
pub(crate) fn normalize_base(base: impl Into<String>) -> String {
    let mut base = base.into();
    while base.ends_with('/') {
        base.pop();
    }
    base
}
