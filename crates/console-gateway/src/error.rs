//! Gateway error taxonomy.

use thiserror::Error;

/// Errors that can occur when calling the platform API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP-level failure after a connection was established.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server could not be reached at all.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server answered with a non-success status and a structured body.
    #[error("API error {code} (HTTP {status})")]
    Api {
        status: u16,
        code: String,
        message: Option<String>,
    },

    /// The server answered successfully but the body failed to parse.
    #[error("failed to parse response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// The structured server error code, if this is a domain failure.
    #[must_use]
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True when the failure never produced a server response.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Connection(_))
    }
}
