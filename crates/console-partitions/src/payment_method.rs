//! `PaymentMethod` - one merchant payment method under review.
//!
//! The record itself is opaque to the state layer; pages render whatever the
//! API returns. A failed fetch goes to the root error sink so the page
//! chrome can display it, rather than surfacing to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;

use console_gateway::ApiGateway;
use console_store::{Context, Partition, StoreError};

use crate::NS_PAYMENT_METHOD;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitArgs {
    merchant_id: String,
    payment_method_id: String,
}

#[derive(Debug, Default)]
struct PaymentMethodState {
    merchant_id: String,
    method_id: String,
    payment_method: Option<Value>,
}

/// Partition holding the payment method under review.
pub struct PaymentMethodPartition {
    state: RwLock<PaymentMethodState>,
    gateway: Arc<dyn ApiGateway>,
}

impl PaymentMethodPartition {
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            state: RwLock::new(PaymentMethodState::default()),
            gateway,
        }
    }

    fn method_path(&self) -> String {
        let state = self.state.read();
        format!(
            "admin/api/v1/merchants/{}/methods/{}",
            state.merchant_id, state.method_id
        )
    }

    async fn fetch(&self, ctx: &Context) -> Result<Value, StoreError> {
        match self.gateway.get(&self.method_path()).await {
            Ok(record) => {
                ctx.commit("paymentMethod", record)?;
            }
            Err(err) => {
                // The page chrome displays the sink entry; the operation
                // itself still resolves.
                ctx.report_error(&err.into());
            }
        }
        Ok(Value::Null)
    }

    async fn update(&self, ctx: &Context) -> Result<Value, StoreError> {
        let record = self
            .state
            .read()
            .payment_method
            .clone()
            .ok_or_else(|| {
                StoreError::payload("PaymentMethod/updatePaymentMethod", "no record loaded")
            })?;
        let response = self.gateway.put(&self.method_path(), Some(record)).await?;
        ctx.commit("paymentMethod", response)?;
        Ok(Value::Null)
    }
}

#[async_trait]
impl Partition for PaymentMethodPartition {
    fn namespace(&self) -> &'static str {
        NS_PAYMENT_METHOD
    }

    async fn handle_action(
        &self,
        ctx: Context,
        action: &str,
        payload: Value,
    ) -> Result<Value, StoreError> {
        match action {
            "initState" => {
                let args: InitArgs = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("PaymentMethod/initState", e))?;
                ctx.commit("merchantId", Value::String(args.merchant_id))?;
                ctx.commit("paymentMethodId", Value::String(args.payment_method_id))?;
                ctx.dispatch("fetchPaymentMethod", Value::Null).await
            }
            "fetchPaymentMethod" => self.fetch(&ctx).await,
            "updatePaymentMethod" => self.update(&ctx).await,
            other => Err(self.unknown_action(other)),
        }
    }

    fn handle_mutation(&self, mutation: &str, payload: Value) -> Result<(), StoreError> {
        match mutation {
            "merchantId" => {
                let id: String = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("PaymentMethod/merchantId", e))?;
                self.state.write().merchant_id = id;
                Ok(())
            }
            "paymentMethodId" => {
                let id: String = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("PaymentMethod/paymentMethodId", e))?;
                self.state.write().method_id = id;
                Ok(())
            }
            "paymentMethod" => {
                self.state.write().payment_method = Some(payload);
                Ok(())
            }
            other => Err(self.unknown_mutation(other)),
        }
    }

    fn getter(&self, name: &str) -> Result<Value, StoreError> {
        let state = self.state.read();
        match name {
            "paymentMethod" => Ok(state.payment_method.clone().unwrap_or(Value::Null)),
            "merchantId" => Ok(Value::String(state.merchant_id.clone())),
            "paymentMethodId" => Ok(Value::String(state.method_id.clone())),
            other => Err(self.unknown_getter(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_gateway::{HttpMethod, ScriptedGateway};
    use console_store::{CapturingErrorSink, RootStore};
    use serde_json::json;

    fn store_with(
        gateway: Arc<ScriptedGateway>,
        sink: Arc<CapturingErrorSink>,
    ) -> Arc<RootStore> {
        RootStore::builder()
            .error_sink(sink)
            .register(Arc::new(PaymentMethodPartition::new(gateway)))
            .unwrap()
            .build()
    }

    #[tokio::test]
    async fn test_init_state_fetches_record() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.ok(
            HttpMethod::Get,
            "admin/api/v1/merchants/m-1/methods/card",
            json!({ "id": "card", "commission": 2.5 }),
        );
        let store = store_with(gateway, Arc::new(CapturingErrorSink::new()));

        store
            .bootstrap(
                NS_PAYMENT_METHOD,
                json!({ "merchantId": "m-1", "paymentMethodId": "card" }),
            )
            .await
            .unwrap();

        let record = store.getter("PaymentMethod/paymentMethod").unwrap();
        assert_eq!(record["commission"], 2.5);
    }

    #[tokio::test]
    async fn test_fetch_failure_reports_to_sink() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.fail_connection(HttpMethod::Get, "admin/api/v1/merchants/m-1/methods/card");
        let sink = Arc::new(CapturingErrorSink::new());
        let store = store_with(gateway, sink.clone());

        // The operation itself resolves; the failure lands in the sink.
        store
            .bootstrap(
                NS_PAYMENT_METHOD,
                json!({ "merchantId": "m-1", "paymentMethodId": "card" }),
            )
            .await
            .unwrap();

        let reports = sink.take();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].starts_with("PaymentMethod:"));
        assert_eq!(
            store.getter("PaymentMethod/paymentMethod").unwrap(),
            Value::Null
        );
    }

    #[tokio::test]
    async fn test_update_commits_server_response() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.ok(
            HttpMethod::Get,
            "admin/api/v1/merchants/m-1/methods/card",
            json!({ "id": "card", "commission": 2.5 }),
        );
        gateway.ok(
            HttpMethod::Put,
            "admin/api/v1/merchants/m-1/methods/card",
            json!({ "id": "card", "commission": 3.0 }),
        );
        let store = store_with(gateway, Arc::new(CapturingErrorSink::new()));

        store
            .bootstrap(
                NS_PAYMENT_METHOD,
                json!({ "merchantId": "m-1", "paymentMethodId": "card" }),
            )
            .await
            .unwrap();
        store
            .dispatch("PaymentMethod/updatePaymentMethod", Value::Null)
            .await
            .unwrap();

        let record = store.getter("PaymentMethod/paymentMethod").unwrap();
        assert_eq!(record["commission"], 3.0);
    }

    #[tokio::test]
    async fn test_update_without_record_is_payload_error() {
        let store = store_with(
            Arc::new(ScriptedGateway::new()),
            Arc::new(CapturingErrorSink::new()),
        );
        let err = store
            .dispatch("PaymentMethod/updatePaymentMethod", Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Payload { .. }));
    }
}
