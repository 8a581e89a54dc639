//! # Wire Envelopes
//!
//! Shapes the REST contract wraps payloads in: list endpoints return
//! `{ items: [...] }`, single-record fetches return `{ item: {...} }`, and
//! error bodies carry `{ code, message? }`.

use serde::{Deserialize, Serialize};

/// Server error code meaning "SKU already exists for this project".
///
/// The owning partition translates this code into a boolean uniqueness
/// result; every other code propagates as a failure.
pub const ERROR_CODE_DUPLICATE_SKU: &str = "kp000006";

/// Marker code used when a failed response carries no parseable error body.
pub const ERROR_CODE_UNSTRUCTURED: &str = "unstructured";

/// Envelope for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ItemsEnvelope<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

impl<T> Default for ItemsEnvelope<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// Envelope for single-record fetch endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEnvelope<T> {
    pub item: T,
}

/// Structured error body returned by the API on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
