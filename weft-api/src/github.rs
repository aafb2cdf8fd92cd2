//! GitHub Actions repository-variables API.

use serde::Deserialize;

use weft_core::config::RepoSlug;

use crate::error::{request_err, ApiError};

/// Default API base; `GITHUB_API_URL` (set by Actions runners) overrides it.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Pinned REST API version header value.
pub const API_VERSION: &str = "2022-11-28";

const PAGE_SIZE: usize = 100;

/// A repository variable as the API returns it. Timestamps and the rest of
/// the payload are irrelevant here and not modeled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoVariable {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct VariablePage {
    total_count: usize,
    #[serde(default)]
    variables: Vec<RepoVariable>,
}

/// Synchronous GitHub REST client scoped to what weft needs.
pub struct GithubClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl GithubClient {
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

    /// Fetch every repository variable, paging until a short page arrives.
    pub fn list_repo_variables(&self, repo: &RepoSlug) -> Result<Vec<RepoVariable>, ApiError> {
        let url = format!(
            "{}/repos/{}/{}/actions/variables",
            self.base_url, repo.owner, repo.name
        );
        let mut variables = Vec::new();
        let mut page = 1usize;

        loop {
            let response = self
                .agent
                .get(&url)
                .query("per_page", &PAGE_SIZE.to_string())
                .query("page", &page.to_string())
                .set("Authorization", &format!("Bearer {}", self.token))
                .set("Accept", "application/vnd.github+json")
                .set("X-GitHub-Api-Version", API_VERSION)
                .set("User-Agent", "weft")
                .call()
                .map_err(|e| request_err("variable listing", e))?;

            let parsed: VariablePage = response.into_json().map_err(|source| ApiError::Body {
                context: "variable listing",
                source,
            })?;

            let fetched = parsed.variables.len();
            variables.extend(parsed.variables);
            if fetched < PAGE_SIZE || variables.len() >= parsed.total_count {
                break;
            }
            page += 1;
        }

        tracing::debug!(
            "fetched {} variables from {}/{}",
            variables.len(),
            repo.owner,
            repo.name
        );
        Ok(variables)
    }
}
