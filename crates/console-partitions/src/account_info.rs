//! `User.Merchant.AccountInfo` - the company profile form.
//!
//! Edits happen against the camelCase form twin; the wire record stays
//! snake_case. Submitting successfully runs the onboarding coordinator
//! sequence as root-scoped calls, in declared order.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use console_gateway::ApiGateway;
use console_store::{Context, Partition, StoreError};
use shared_types::{CompanyForm, CompanyRecord, Merchant};

use crate::NS_ACCOUNT_INFO;

/// Onboarding step this partition completes on successful submission.
const STEP_COMPANY: &str = "company";

/// Cities offered per country. Lookup falls back to `US` when the form has
/// no country yet.
const CITIES_BY_COUNTRY: &[(&str, &[&str])] = &[
    ("US", &["New York", "San Francisco", "Chicago", "Austin"]),
    ("GB", &["London", "Manchester", "Edinburgh"]),
    ("DE", &["Berlin", "Munich", "Hamburg"]),
    ("FR", &["Paris", "Lyon", "Marseille"]),
    ("RU", &["Moscow", "Saint Petersburg", "Novosibirsk"]),
    ("CN", &["Beijing", "Shanghai", "Shenzhen"]),
];

fn cities_for(country: &str) -> &'static [&'static str] {
    CITIES_BY_COUNTRY
        .iter()
        .find(|(code, _)| *code == country)
        .map(|(_, cities)| *cities)
        .unwrap_or(&[])
}

/// Partition holding the company profile under edit.
pub struct AccountInfoPartition {
    state: RwLock<CompanyRecord>,
    gateway: Arc<dyn ApiGateway>,
}

impl AccountInfoPartition {
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            state: RwLock::new(CompanyRecord::default()),
            gateway,
        }
    }

    /// Submit the company profile and run the onboarding coordinator
    /// sequence: replace the merchant record, mark the step complete, start
    /// the notification watch. Resolves `true` when the server returned the
    /// authoritative record.
    async fn submit(&self, ctx: &Context) -> Result<Value, StoreError> {
        let body = serde_json::to_value(&*self.state.read())
            .map_err(|e| StoreError::payload("User.Merchant.AccountInfo/submitAccountInfo", e))?;
        let response = self
            .gateway
            .put("admin/api/v1/merchants/company", Some(body))
            .await?;

        if response.is_null() {
            return Ok(Value::Bool(false));
        }

        debug!("company profile accepted, running onboarding sequence");
        ctx.dispatch_root("User.Merchant/changeMerchant", response).await?;
        ctx.dispatch_root("User.Merchant/completeStep", Value::String(STEP_COMPANY.into()))
            .await?;
        ctx.dispatch_root("User.Notifications/watchForNotifications", Value::Null)
            .await?;
        Ok(Value::Bool(true))
    }
}

#[async_trait]
impl Partition for AccountInfoPartition {
    fn namespace(&self) -> &'static str {
        NS_ACCOUNT_INFO
    }

    async fn handle_action(
        &self,
        ctx: Context,
        action: &str,
        payload: Value,
    ) -> Result<Value, StoreError> {
        match action {
            // Copies the merchant's company record if onboarding already
            // filled one in. No network call; repeat calls re-copy.
            "initState" => {
                let merchant: Merchant =
                    serde_json::from_value(ctx.getter_root("User.Merchant/merchant")?)
                        .map_err(|e| StoreError::payload("User.Merchant/merchant", e))?;
                if let Some(company) = merchant.company {
                    ctx.commit(
                        "accountInfo",
                        serde_json::to_value(company).unwrap_or_default(),
                    )?;
                }
                Ok(Value::Null)
            }
            "submitAccountInfo" => self.submit(&ctx).await,
            "updateAccountInfo" => {
                let form: CompanyForm = serde_json::from_value(payload).map_err(|e| {
                    StoreError::payload("User.Merchant.AccountInfo/updateAccountInfo", e)
                })?;
                let record = CompanyRecord::from(form);
                ctx.commit(
                    "accountInfo",
                    serde_json::to_value(record).unwrap_or_default(),
                )?;
                Ok(Value::Null)
            }
            other => Err(self.unknown_action(other)),
        }
    }

    fn handle_mutation(&self, mutation: &str, payload: Value) -> Result<(), StoreError> {
        match mutation {
            "accountInfo" => {
                let record: CompanyRecord = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("User.Merchant.AccountInfo/accountInfo", e))?;
                *self.state.write() = record;
                Ok(())
            }
            other => Err(self.unknown_mutation(other)),
        }
    }

    fn getter(&self, name: &str) -> Result<Value, StoreError> {
        match name {
            // The display-ready camelCase view of the wire record.
            "accountInfo" => {
                let form = CompanyForm::from(self.state.read().clone());
                serde_json::to_value(form)
                    .map_err(|e| StoreError::payload("User.Merchant.AccountInfo/accountInfo", e))
            }
            "cities" => {
                let state = self.state.read();
                let country = if state.country.is_empty() {
                    "US"
                } else {
                    state.country.as_str()
                };
                Ok(serde_json::to_value(cities_for(country)).unwrap_or_default())
            }
            other => Err(self.unknown_getter(other)),
        }
    }
}
