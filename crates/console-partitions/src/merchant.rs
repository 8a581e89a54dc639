//! `User.Merchant` - the authenticated merchant record.
//!
//! Seeded once by the host session layer; replaced wholesale with the
//! server's authoritative copy after onboarding submissions. Onboarding
//! step completion is tracked beside the record so a record replacement
//! cannot clobber locally marked steps.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use console_store::{Context, Partition, StoreError};
use shared_types::Merchant;

use crate::NS_MERCHANT;

#[derive(Debug, Default)]
struct MerchantState {
    merchant: Merchant,
    completed_steps: Vec<String>,
}

/// Partition holding the authenticated merchant.
pub struct MerchantPartition {
    state: RwLock<MerchantState>,
}

impl MerchantPartition {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MerchantState::default()),
        }
    }
}

impl Default for MerchantPartition {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Partition for MerchantPartition {
    fn namespace(&self) -> &'static str {
        NS_MERCHANT
    }

    async fn handle_action(
        &self,
        ctx: Context,
        action: &str,
        payload: Value,
    ) -> Result<Value, StoreError> {
        match action {
            // Bootstrap with the session-provided merchant record. Repeat
            // calls replace the record, so the operation is idempotent.
            "initState" | "changeMerchant" => {
                ctx.commit("merchant", payload)?;
                Ok(Value::Null)
            }
            "completeStep" => {
                let step: String = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("User.Merchant/completeStep", e))?;
                let mut steps = self.state.read().completed_steps.clone();
                if !steps.contains(&step) {
                    steps.push(step);
                }
                ctx.commit("completedSteps", serde_json::to_value(steps).unwrap_or_default())?;
                Ok(Value::Null)
            }
            other => Err(self.unknown_action(other)),
        }
    }

    fn handle_mutation(&self, mutation: &str, payload: Value) -> Result<(), StoreError> {
        match mutation {
            "merchant" => {
                let merchant: Merchant = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("User.Merchant/merchant", e))?;
                self.state.write().merchant = merchant;
                Ok(())
            }
            "completedSteps" => {
                let steps: Vec<String> = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("User.Merchant/completedSteps", e))?;
                self.state.write().completed_steps = steps;
                Ok(())
            }
            other => Err(self.unknown_mutation(other)),
        }
    }

    fn getter(&self, name: &str) -> Result<Value, StoreError> {
        let state = self.state.read();
        match name {
            "merchant" => serde_json::to_value(&state.merchant)
                .map_err(|e| StoreError::payload("User.Merchant/merchant", e)),
            "completedSteps" => serde_json::to_value(&state.completed_steps)
                .map_err(|e| StoreError::payload("User.Merchant/completedSteps", e)),
            other => Err(self.unknown_getter(other)),
        }
    }
}
