use http::StatusCode;
use thiserror::Error;

/// Message used when no upstream message is available at any level
const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Errors surfaced by upstream operations
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The deadline fired before the upstream call resolved
    #[error("Upstream timeout")]
    Timeout,

    /// Upstream returned a non-2xx response, with its structured error
    /// message when the body carried one
    #[error("upstream returned {status}")]
    Api {
        /// Status reported by upstream
        status: StatusCode,
        /// Message parsed from the upstream error body
        message: Option<String>,
    },

    /// Transport-level failure talking to upstream
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Failure while consuming an already-initiated stream
    #[error("streaming error: {0}")]
    Streaming(String),

    /// Anything else, including malformed request bodies
    #[error("{0}")]
    Unexpected(String),
}

impl UpstreamError {
    /// Status code for the downstream response
    ///
    /// Priority: upstream-reported status, then the status nested in the
    /// transport error, then 504 for aborts and timeouts, then 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Api { status, .. } => *status,
            Self::Transport(e) => e.status().unwrap_or(if e.is_timeout() {
                StatusCode::GATEWAY_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }),
            Self::Streaming(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message for the downstream `{"message"}` body
    ///
    /// Priority: upstream structured error message, then the error's own
    /// description, then the fallback literal.
    pub fn client_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            Self::Unexpected(m) if m.is_empty() => FALLBACK_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Extract the upstream error message from a non-2xx response body
///
/// Tries the structured shape `{"error": {"message": ...}}` first, then a
/// top-level `{"message": ...}`, mirroring the priority the normalizer
/// promises. Returns `None` for unparseable bodies or blank messages.
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .or_else(|| value.get("message"))
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}
