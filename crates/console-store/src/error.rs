//! Store error taxonomy.
//!
//! `Unknown*` and `InvalidPath` variants are configuration errors: they mean
//! the wiring is wrong, and callers are expected to fail loudly rather than
//! degrade.

use console_gateway::GatewayError;
use thiserror::Error;

/// Errors surfaced by root-store resolution and partition operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Operation path did not contain a `/` separator.
    #[error("invalid operation path `{0}`: expected `<Namespace>/<operation>`")]
    InvalidPath(String),

    /// No partition is registered under the namespace.
    #[error("unknown namespace `{0}`")]
    UnknownNamespace(String),

    /// The partition exists but declares no such action.
    #[error("unknown action `{action}` in namespace `{namespace}`")]
    UnknownAction { namespace: String, action: String },

    /// The partition exists but declares no such mutation.
    #[error("unknown mutation `{mutation}` in namespace `{namespace}`")]
    UnknownMutation {
        namespace: String,
        mutation: String,
    },

    /// The partition exists but declares no such getter.
    #[error("unknown getter `{getter}` in namespace `{namespace}`")]
    UnknownGetter { namespace: String, getter: String },

    /// Two partitions were registered under the same namespace.
    #[error("namespace `{0}` registered twice")]
    DuplicateNamespace(String),

    /// An operation payload failed to deserialize.
    #[error("invalid payload for `{path}`: {detail}")]
    Payload { path: String, detail: String },

    /// A remote call made by an action failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The push channel could not be established.
    #[error("channel failure: {0}")]
    Channel(String),
}

impl StoreError {
    /// Build a payload error from a deserialization failure.
    pub fn payload(path: impl Into<String>, detail: impl ToString) -> Self {
        Self::Payload {
            path: path.into(),
            detail: detail.to_string(),
        }
    }

    /// The structured API error code, if this wraps a domain failure.
    #[must_use]
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Gateway(err) => err.api_code(),
            _ => None,
        }
    }

    /// True for wiring mistakes that should halt development loudly.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath(_)
                | Self::UnknownNamespace(_)
                | Self::UnknownAction { .. }
                | Self::UnknownMutation { .. }
                | Self::UnknownGetter { .. }
                | Self::DuplicateNamespace(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_flagged() {
        assert!(StoreError::UnknownNamespace("Nope".into()).is_configuration());
        assert!(!StoreError::Channel("refused".into()).is_configuration());
    }
}
