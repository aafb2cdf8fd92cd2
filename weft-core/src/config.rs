//! Environment configuration surface.
//!
//! # API pattern
//!
//! Every constructor has two forms:
//! - `from_lookup(lookup)` — explicit variable lookup; used in tests with a
//!   closure over a map
//! - `from_env()` — reads the process environment, delegates to `from_lookup`
//!
//! Tests must NEVER call `from_env()`; always use `from_lookup`.
//!
//! A required variable that is unset *or empty* is a fatal configuration
//! error, raised before any network call.

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Service principal
// ---------------------------------------------------------------------------

/// Entra ID service-principal credentials used for the client-credentials
/// token grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePrincipal {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}

// ---------------------------------------------------------------------------
// Repository slug
// ---------------------------------------------------------------------------

/// An `owner/name` repository pair, parsed by splitting on the first `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedRepo {
            value: value.to_owned(),
        };
        let (owner, name) = value.split_once('/').ok_or_else(malformed)?;
        if owner.is_empty() || name.is_empty() {
            return Err(malformed());
        }
        Ok(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// Provisioning configuration
// ---------------------------------------------------------------------------

/// Everything `weft provision` needs, resolved up front so a missing
/// variable fails the run before the first request goes out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    pub principal: ServicePrincipal,
    pub capacity_id: String,
    pub git_connection_id: String,
    pub workspace_prefix: String,
    pub branch: String,
    pub repo: RepoSlug,
    /// Directory within the repository the workspace is bound to.
    pub git_directory: String,
    /// Optional Fabric API base override (`FABRIC_API_URL`).
    pub api_base: Option<String>,
}

impl ProvisionConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve from an explicit lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let principal = ServicePrincipal {
            client_id: required(&lookup, "FABRIC_CLIENT_ID")?,
            client_secret: required(&lookup, "FABRIC_CLIENT_SECRET")?,
            tenant_id: required(&lookup, "FABRIC_TENANT_ID")?,
        };
        let repo = RepoSlug::parse(&required(&lookup, "GITHUB_REPOSITORY")?)?;
        Ok(Self {
            principal,
            capacity_id: required(&lookup, "FABRIC_CAPACITY_ID")?,
            git_connection_id: required(&lookup, "FABRIC_GIT_CONNECTION_ID")?,
            workspace_prefix: required(&lookup, "WORKSPACE_PREFIX")?,
            branch: required(&lookup, "BRANCH_NAME")?,
            repo,
            git_directory: optional(&lookup, "FABRIC_GIT_DIRECTORY").unwrap_or_else(|| "/".to_owned()),
            api_base: optional(&lookup, "FABRIC_API_URL"),
        })
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or(ConfigError::MissingVar { name })
}

fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
