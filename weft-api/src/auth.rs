//! Entra ID client-credentials token grant.

use serde::Deserialize;

use weft_core::config::ServicePrincipal;

use crate::error::{request_err, ApiError};

/// Default token authority. Overridable for tests.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Scope requested for every token — the Fabric API's default audience.
pub const FABRIC_SCOPE: &str = "https://api.fabric.microsoft.com/.default";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Fetch a bearer token for the Fabric API via the client-credentials grant.
///
/// `POST {authority}/{tenant_id}/oauth2/v2.0/token`, form-encoded. The
/// secret is sent and never logged.
pub fn fetch_token(authority: &str, principal: &ServicePrincipal) -> Result<String, ApiError> {
    let authority = crate::normalize_base(authority);
    let url = format!("{authority}/{}/oauth2/v2.0/token", principal.tenant_id);
    tracing::debug!("requesting token for tenant {}", principal.tenant_id);

    let response = crate::agent()
        .post(&url)
        .send_form(&[
            ("client_id", principal.client_id.as_str()),
            ("client_secret", principal.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", FABRIC_SCOPE),
        ])
        .map_err(|e| request_err("token request", e))?;

    let parsed: TokenResponse = response.into_json().map_err(|source| ApiError::Body {
        context: "token request",
        source,
    })?;
    parsed
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::MissingToken)
}
