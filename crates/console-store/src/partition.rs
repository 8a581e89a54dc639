//! The contract every state partition implements.

use async_trait::async_trait;
use serde_json::Value;

use crate::{Context, StoreError};

/// A self-contained unit of state + mutators + async operations, namespaced
/// by domain.
///
/// Partitions are registered once when the root store is assembled and live
/// for the whole application session. Their state is private: other
/// partitions read it only through root-scoped getters.
#[async_trait]
pub trait Partition: Send + Sync {
    /// Full dotted namespace this partition is addressed by,
    /// e.g. `User.Merchant`.
    fn namespace(&self) -> &'static str;

    /// Run an async operation. Operations may call the gateway and may
    /// issue root-scoped calls through `ctx`; their own mutations apply in
    /// the order they are issued.
    async fn handle_action(
        &self,
        ctx: Context,
        action: &str,
        payload: Value,
    ) -> Result<Value, StoreError>;

    /// Apply a synchronous mutation. Mutations are whole-field replacement
    /// keyed by name and are the only permitted state writers.
    fn handle_mutation(&self, mutation: &str, payload: Value) -> Result<(), StoreError>;

    /// Evaluate a derived getter: a pure function of this partition's state.
    fn getter(&self, name: &str) -> Result<Value, StoreError>;

    /// Fail-fast error for an action this partition does not declare.
    fn unknown_action(&self, action: &str) -> StoreError {
        StoreError::UnknownAction {
            namespace: self.namespace().to_string(),
            action: action.to_string(),
        }
    }

    /// Fail-fast error for a mutation this partition does not declare.
    fn unknown_mutation(&self, mutation: &str) -> StoreError {
        StoreError::UnknownMutation {
            namespace: self.namespace().to_string(),
            mutation: mutation.to_string(),
        }
    }

    /// Fail-fast error for a getter this partition does not declare.
    fn unknown_getter(&self, getter: &str) -> StoreError {
        StoreError::UnknownGetter {
            namespace: self.namespace().to_string(),
            getter: getter.to_string(),
        }
    }
}
