//! Fabric workspace API: lookup/create and Git linking.
//!
//! Provisioning is the classic idempotent "ensure exists" pattern: safe to
//! invoke repeatedly, never creates duplicates under sequential use. There
//! is no conditional-create, so two concurrent runs can still race; the CI
//! pipeline serializes invocations.

use serde::Deserialize;
use serde_json::json;

use weft_core::types::{WorkspaceId, WorkspaceName};

use crate::error::{request_err, ApiError};

/// Default Fabric REST base. Overridable via `FABRIC_API_URL` and in tests.
pub const DEFAULT_BASE_URL: &str = "https://api.fabric.microsoft.com/v1";

/// Error codes the Git-connect call treats as "already linked" — an
/// idempotent no-op rather than a failure.
pub const ALREADY_CONNECTED_CODES: [&str; 2] = [
    "WorkspaceAlreadyConnectedToGit",
    "GitProviderResourceAlreadyConnected",
];

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A workspace as the list/create endpoints return it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
struct WorkspacePage {
    #[serde(default)]
    value: Vec<Workspace>,
    #[serde(rename = "continuationToken")]
    continuation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of [`FabricClient::ensure_workspace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// An exact display-name match already existed.
    Existing(WorkspaceId),
    /// No match was found; a workspace was created.
    Created(WorkspaceId),
}

impl EnsureOutcome {
    pub fn id(&self) -> &WorkspaceId {
        match self {
            EnsureOutcome::Existing(id) | EnsureOutcome::Created(id) => id,
        }
    }
}

/// Result of [`FabricClient::connect_git`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitConnectOutcome {
    Connected,
    /// The service reported one of [`ALREADY_CONNECTED_CODES`].
    AlreadyConnected { code: String },
}

/// Everything the Git-connect call needs besides the workspace id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitLink {
    pub owner: String,
    pub repository: String,
    pub branch: String,
    pub directory: String,
    /// Pre-configured Fabric Git connection carrying the credentials.
    pub connection_id: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous Fabric REST client. One bearer token for the lifetime of the
/// client — a run is far shorter than a token.
pub struct FabricClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl FabricClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, token)
    }

    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            agent: crate::agent(),
            base_url: crate::normalize_base(base_url),
            token: token.into(),
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// List every workspace visible to the principal, following the
    /// continuation token until the listing is exhausted.
    pub fn list_workspaces(&self) -> Result<Vec<Workspace>, ApiError> {
        let url = format!("{}/workspaces", self.base_url);
        let mut workspaces = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self
                .agent
                .get(&url)
                .set("Authorization", &self.bearer());
            if let Some(token) = &continuation {
                request = request.query("continuationToken", token);
            }
            let response = request
                .call()
                .map_err(|e| request_err("workspace listing", e))?;
            let page: WorkspacePage = response.into_json().map_err(|source| ApiError::Body {
                context: "workspace listing",
                source,
            })?;

            workspaces.extend(page.value);
            match page.continuation_token {
                Some(token) if !token.is_empty() => continuation = Some(token),
                _ => break,
            }
        }

        tracing::debug!("listed {} workspaces", workspaces.len());
        Ok(workspaces)
    }

    /// Exact, case-sensitive display-name lookup.
    pub fn find_workspace(&self, name: &WorkspaceName) -> Result<Option<Workspace>, ApiError> {
        Ok(find_by_name(self.list_workspaces()?, name))
    }

    /// Create a workspace on the given capacity.
    pub fn create_workspace(
        &self,
        name: &WorkspaceName,
        capacity_id: &str,
    ) -> Result<Workspace, ApiError> {
        let url = format!("{}/workspaces", self.base_url);
        let response = self
            .agent
            .post(&url)
            .set("Authorization", &self.bearer())
            .send_json(json!({
                "displayName": name.0,
                "capacityId": capacity_id,
            }))
            .map_err(|e| request_err("workspace create", e))?;

        let workspace: Workspace = response.into_json().map_err(|source| ApiError::Body {
            context: "workspace create",
            source,
        })?;
        tracing::info!("created workspace '{}' ({})", name, workspace.id);
        Ok(workspace)
    }

    /// Look the workspace up by display name; create it if absent.
    pub fn ensure_workspace(
        &self,
        name: &WorkspaceName,
        capacity_id: &str,
    ) -> Result<EnsureOutcome, ApiError> {
        if let Some(existing) = self.find_workspace(name)? {
            tracing::info!("workspace '{}' already exists ({})", name, existing.id);
            return Ok(EnsureOutcome::Existing(existing.id));
        }
        let created = self.create_workspace(name, capacity_id)?;
        Ok(EnsureOutcome::Created(created.id))
    }

    /// Bind the workspace to a repository/branch through the configured Git
    /// connection. A recognized "already connected" error code is a no-op.
    pub fn connect_git(
        &self,
        workspace: &WorkspaceId,
        link: &GitLink,
    ) -> Result<GitConnectOutcome, ApiError> {
        let url = format!("{}/workspaces/{}/git/connect", self.base_url, workspace.0);
        let result = self
            .agent
            .post(&url)
            .set("Authorization", &self.bearer())
            .send_json(json!({
                "gitProviderDetails": {
                    "gitProviderType": "GitHub",
                    "ownerName": link.owner,
                    "repositoryName": link.repository,
                    "branchName": link.branch,
                    "directoryName": link.directory,
                },
                "myGitCredentials": {
                    "source": "ConfiguredConnection",
                    "connectionId": link.connection_id,
                },
            }));

        match result {
            Ok(_) => Ok(GitConnectOutcome::Connected),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                match already_connected_code(&body) {
                    Some(code) => {
                        tracing::warn!("workspace {} already connected to Git ({code})", workspace);
                        Ok(GitConnectOutcome::AlreadyConnected { code })
                    }
                    None => Err(ApiError::Status {
                        context: "git connect",
                        status,
                        body,
                    }),
                }
            }
            Err(err) => Err(request_err("git connect", err)),
        }
    }
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

fn find_by_name(workspaces: Vec<Workspace>, name: &WorkspaceName) -> Option<Workspace> {
    workspaces.into_iter().find(|w| w.display_name == name.0)
}

/// Extract a recognized already-connected error code from a non-2xx body.
/// An empty or unparsable body yields `None` and stays fatal.
fn already_connected_code(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error_code
        .filter(|code| ALREADY_CONNECTED_CODES.contains(&code.as_str()))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
