//! Error types for weft-api.

use thiserror::Error;

/// All errors that can arise from a REST call. Every variant is terminal for
/// the run — nothing here is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection-level failure (DNS, TLS, refused, timeout).
    #[error("transport error: {0}")]
    Transport(Box<ureq::Transport>),

    /// Non-2xx response. The body is preserved verbatim so the operator can
    /// see what the service said.
    #[error("{context} failed with HTTP {status}: {body}")]
    Status {
        context: &'static str,
        status: u16,
        body: String,
    },

    /// A 2xx response whose body could not be read or decoded.
    #[error("{context} returned an unreadable body: {source}")]
    Body {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The token endpoint answered 2xx without an `access_token`.
    #[error("token response carried no access_token")]
    MissingToken,
}

/// Map a `ureq` failure into [`ApiError`], draining the error body for
/// non-2xx responses.
pub(crate) fn request_err(context: &'static str, err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            ApiError::Status {
                context,
                status,
                body,
            }
        }
        ureq::Error::Transport(transport) => ApiError::Transport(Box::new(transport)),
    }
}
