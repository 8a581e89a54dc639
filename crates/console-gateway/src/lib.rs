//! # Console Gateway - Remote Data Gateway
//!
//! Performs typed HTTP calls against the configured API base URL and
//! surfaces success payloads or structured failures.
//!
//! ## Contract
//!
//! - Exactly one network call per invocation; retries, if any, belong to
//!   the caller.
//! - Failures carry the server-provided structured error code when one is
//!   present, else a generic transport/unstructured marker.
//! - Network I/O only; the gateway never touches partition state.
//!
//! Partitions depend on the [`ApiGateway`] trait, not on the HTTP
//! implementation, so tests substitute scripted fakes at the seam.

mod client;
mod error;
mod mock;

pub use client::HttpGateway;
pub use error::GatewayError;
pub use mock::{RecordedCall, ScriptedGateway};

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// HTTP methods the REST contract uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Patch,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// The gateway seam every partition calls through.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Issue one HTTP request against a path relative to the API base.
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, GatewayError>;

    /// GET convenience wrapper.
    async fn get(&self, path: &str) -> Result<Value, GatewayError> {
        self.request(HttpMethod::Get, path, None).await
    }

    /// PUT convenience wrapper.
    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, GatewayError> {
        self.request(HttpMethod::Put, path, body).await
    }

    /// PATCH convenience wrapper.
    async fn patch(&self, path: &str, body: Option<Value>) -> Result<Value, GatewayError> {
        self.request(HttpMethod::Patch, path, body).await
    }

    /// POST convenience wrapper.
    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, GatewayError> {
        self.request(HttpMethod::Post, path, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }
}
