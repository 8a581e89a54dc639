//! `Project` - a merchant project under edit.
//!
//! Creation flows (`id == "new"`) seed a default record locally without any
//! network call; edit flows fetch the record. The merchant's currency
//! selections are the one durably persisted preference: read at partition
//! construction, written back on every update.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use console_gateway::ApiGateway;
use console_store::{Context, Partition, PrefStore, StoreError};
use shared_types::{
    CurrencyRegionPair, ItemEnvelope, LocalizedName, ProjectRecord, ERROR_CODE_DUPLICATE_SKU,
};

use crate::NS_PROJECT;

/// Preference key holding the JSON-encoded currency selection list.
const PREF_KEY_CURRENCIES: &str = "projectCurrencies";

/// Selection list used when no preference was persisted yet.
const DEFAULT_CURRENCIES: &[&str] = &["USD"];

/// Placeholder endpoint URL seeded into new records.
const DEFAULT_CALLBACK_URL: &str = "https://ya.ru";

/// Bootstrap arguments: a record id (or `"new"`) plus creation-seed hints.
#[derive(Debug, Deserialize)]
struct InitArgs {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

/// Strip client-only fields and default optional collections before the
/// record goes back on the wire.
fn map_form_to_api(mut form: Value) -> Value {
    if let Some(object) = form.as_object_mut() {
        object.remove("create_order_allowed_urls");
        let emails = object.entry("notify_emails").or_insert(Value::Null);
        if emails.is_null() {
            *emails = json!([]);
        }
    }
    form
}

fn default_record(args: &InitArgs) -> ProjectRecord {
    ProjectRecord {
        id: None,
        name: LocalizedName {
            en: args.name.clone().unwrap_or_default(),
            ru: String::new(),
        },
        image: args.image.clone().unwrap_or_default(),
        url_check_account: DEFAULT_CALLBACK_URL.into(),
        url_process_payment: DEFAULT_CALLBACK_URL.into(),
        url_redirect_success: DEFAULT_CALLBACK_URL.into(),
        url_redirect_fail: DEFAULT_CALLBACK_URL.into(),
        secret_key: String::new(),
        create_invoice_allowed_urls: Vec::new(),
        callback_protocol: "default".into(),
        min_payment_amount: 0,
        max_payment_amount: 0,
        callback_currency: String::new(),
        limits_currency: String::new(),
        is_products_checkout: true,
        notify_emails: Vec::new(),
    }
}

#[derive(Debug, Default)]
struct ProjectState {
    project: Option<ProjectRecord>,
    public_name: String,
    currencies: Vec<String>,
}

/// Partition holding the project under edit.
pub struct ProjectPartition {
    state: RwLock<ProjectState>,
    gateway: Arc<dyn ApiGateway>,
    prefs: Arc<dyn PrefStore>,
}

impl ProjectPartition {
    /// Construct the partition, restoring the persisted currency selections.
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>, prefs: Arc<dyn PrefStore>) -> Self {
        let currencies = match prefs.read(PREF_KEY_CURRENCIES) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(%err, "persisted currency selections unreadable, using default");
                DEFAULT_CURRENCIES.iter().map(ToString::to_string).collect()
            }),
            None => DEFAULT_CURRENCIES.iter().map(ToString::to_string).collect(),
        };

        Self {
            state: RwLock::new(ProjectState {
                project: None,
                public_name: String::new(),
                currencies,
            }),
            gateway,
            prefs,
        }
    }

    fn record_id(&self) -> Result<String, StoreError> {
        self.state
            .read()
            .project
            .as_ref()
            .and_then(|p| p.id.clone())
            .ok_or_else(|| StoreError::payload("Project/saveProject", "no persisted project loaded"))
    }

    async fn fetch_project(&self, ctx: &Context, payload: Value) -> Result<Value, StoreError> {
        let id: String = serde_json::from_value(payload)
            .map_err(|e| StoreError::payload("Project/fetchProject", e))?;
        let body = self
            .gateway
            .get(&format!("admin/api/v1/projects/{id}"))
            .await?;
        let envelope: ItemEnvelope<ProjectRecord> = serde_json::from_value(body)
            .map_err(|e| StoreError::payload("Project/fetchProject", e))?;

        let name = envelope.item.name.clone();
        ctx.commit(
            "project",
            serde_json::to_value(envelope.item).unwrap_or_default(),
        )?;
        ctx.commit(
            "projectPublicName",
            serde_json::to_value(name).unwrap_or_default(),
        )?;
        Ok(Value::Null)
    }

    async fn save_project(&self, ctx: &Context, payload: Value) -> Result<Value, StoreError> {
        let id = self.record_id()?;
        self.gateway
            .patch(
                &format!("admin/api/v1/projects/{id}"),
                Some(map_form_to_api(payload)),
            )
            .await?;

        // The record keeps its current name; only the display name is
        // re-derived after a save.
        let name = self
            .state
            .read()
            .project
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        ctx.commit(
            "projectPublicName",
            serde_json::to_value(name).unwrap_or_default(),
        )?;
        Ok(Value::Null)
    }

    /// Resolve to `false` on the duplicate-key code; propagate anything else.
    async fn check_sku_unique(&self, payload: Value) -> Result<Value, StoreError> {
        let sku: String = serde_json::from_value(payload)
            .map_err(|e| StoreError::payload("Project/checkIsSkuUnique", e))?;
        let id = self.record_id()?;

        match self
            .gateway
            .post(
                &format!("admin/api/v1/projects/{id}/sku"),
                Some(json!({ "sku": sku })),
            )
            .await
        {
            Ok(_) => Ok(Value::Bool(true)),
            Err(err) if err.api_code() == Some(ERROR_CODE_DUPLICATE_SKU) => Ok(Value::Bool(false)),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl Partition for ProjectPartition {
    fn namespace(&self) -> &'static str {
        NS_PROJECT
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
                    .map_err(|e| StoreError::payload("Project/initState", e))?;
                if args.id == "new" {
                    // Creation flow: seed locally, no network call. Repeat
                    // bootstraps rebuild the identical record.
                    let record = default_record(&args);
                    let name = record.name.clone();
                    ctx.commit(
                        "project",
                        serde_json::to_value(record).unwrap_or_default(),
                    )?;
                    ctx.commit(
                        "projectPublicName",
                        serde_json::to_value(name).unwrap_or_default(),
                    )?;
                    return Ok(Value::Null);
                }
                ctx.dispatch("fetchProject", json!(args.id)).await
            }
            "fetchProject" => self.fetch_project(&ctx, payload).await,
            "saveProject" => self.save_project(&ctx, payload).await,
            "checkIsSkuUnique" => self.check_sku_unique(payload).await,
            other => Err(self.unknown_action(other)),
        }
    }

    fn handle_mutation(&self, mutation: &str, payload: Value) -> Result<(), StoreError> {
        match mutation {
            "project" => {
                let record: ProjectRecord = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("Project/project", e))?;
                self.state.write().project = Some(record);
                Ok(())
            }
            "projectPublicName" => {
                let name: LocalizedName = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("Project/projectPublicName", e))?;
                self.state.write().public_name = name.en;
                Ok(())
            }
            "currencies" => {
                let currencies: Vec<String> = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("Project/currencies", e))?;
                match serde_json::to_string(&currencies) {
                    Ok(raw) => self.prefs.write(PREF_KEY_CURRENCIES, &raw),
                    Err(err) => warn!(%err, "failed to encode currency selections"),
                }
                self.state.write().currencies = currencies;
                Ok(())
            }
            other => Err(self.unknown_mutation(other)),
        }
    }

    fn getter(&self, name: &str) -> Result<Value, StoreError> {
        let state = self.state.read();
        match name {
            "project" => serde_json::to_value(&state.project)
                .map_err(|e| StoreError::payload("Project/project", e)),
            "projectPublicName" => Ok(Value::String(state.public_name.clone())),
            "currencies" => serde_json::to_value(&state.currencies)
                .map_err(|e| StoreError::payload("Project/currencies", e)),
            "currenciesDetailed" => {
                let pairs: Vec<CurrencyRegionPair> = state
                    .currencies
                    .iter()
                    .map(|key| CurrencyRegionPair::from_key(key))
                    .collect();
                serde_json::to_value(pairs)
                    .map_err(|e| StoreError::payload("Project/currenciesDetailed", e))
            }
            other => Err(self.unknown_getter(other)),
        }
    }
}
