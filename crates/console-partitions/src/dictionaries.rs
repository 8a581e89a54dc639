//! `Dictionaries` - shared reference data.
//!
//! Currencies are seeded so selectors render before any fetch completes;
//! countries and region/currency pairings stream in during bootstrap.
//! Dictionary fetches are an enhancement: failures fall back to empty lists
//! and never surface to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use console_gateway::ApiGateway;
use console_store::{Context, Partition, StoreError};
use shared_types::{Country, Currency, ItemsEnvelope, RegionCurrencies};

use crate::NS_DICTIONARIES;

/// Seam to the i18n string tables, which live outside the state core.
pub trait LabelProvider: Send + Sync {
    /// Display label for a country ISO code.
    fn country_label(&self, iso_code: &str) -> String;
}

/// Default label provider: the ISO code itself.
pub struct IsoLabels;

impl LabelProvider for IsoLabels {
    fn country_label(&self, iso_code: &str) -> String {
        iso_code.to_string()
    }
}

/// Wire shape of the region/currency pairing endpoint.
#[derive(Debug, Deserialize, Default)]
struct RegionsEnvelope {
    #[serde(default)]
    regions: Vec<RegionCurrencies>,
}

#[derive(Debug)]
struct DictionariesState {
    currencies: Vec<Currency>,
    regions_currencies: Vec<RegionCurrencies>,
    countries: Vec<Country>,
}

impl Default for DictionariesState {
    fn default() -> Self {
        Self {
            currencies: ["USD", "EUR", "RUB", "GBP"]
                .iter()
                .map(|code| Currency::from_code(code))
                .collect(),
            regions_currencies: Vec::new(),
            countries: Vec::new(),
        }
    }
}

/// Partition holding shared dictionaries.
pub struct DictionariesPartition {
    state: RwLock<DictionariesState>,
    gateway: Arc<dyn ApiGateway>,
    labels: Arc<dyn LabelProvider>,
}

impl DictionariesPartition {
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>, labels: Arc<dyn LabelProvider>) -> Self {
        Self {
            state: RwLock::new(DictionariesState::default()),
            gateway,
            labels,
        }
    }

    async fn fetch_currencies(&self, ctx: &Context, payload: Value) -> Result<Value, StoreError> {
        let search: String = serde_json::from_value(payload).unwrap_or_default();
        let path = if search.is_empty() {
            "api/v1/currency".to_string()
        } else {
            format!("api/v1/currency?name={search}")
        };

        match self.gateway.get(&path).await {
            Ok(body) => {
                let envelope: ItemsEnvelope<Currency> =
                    serde_json::from_value(body).unwrap_or_default();
                // An empty result keeps the seeded list so selectors never
                // go blank mid-search.
                if !envelope.items.is_empty() {
                    ctx.commit(
                        "currencies",
                        serde_json::to_value(envelope.items).unwrap_or_default(),
                    )?;
                }
            }
            Err(err) => {
                warn!(%err, "currency dictionary fetch failed");
            }
        }
        Ok(Value::Null)
    }

    async fn fetch_regions_currencies(&self, ctx: &Context) -> Result<Value, StoreError> {
        let regions = match self.gateway.get("api/v1/price_group/currencies").await {
            Ok(body) => serde_json::from_value::<RegionsEnvelope>(body)
                .unwrap_or_default()
                .regions,
            Err(err) => {
                warn!(%err, "region currencies fetch failed, using empty list");
                Vec::new()
            }
        };
        ctx.commit(
            "regionsCurrencies",
            serde_json::to_value(regions).unwrap_or_default(),
        )?;
        Ok(Value::Null)
    }

    async fn fetch_countries(&self, ctx: &Context) -> Result<Value, StoreError> {
        let countries = match self.gateway.get("api/v1/country").await {
            Ok(body) => {
                serde_json::from_value::<ItemsEnvelope<Country>>(body)
                    .unwrap_or_default()
                    .items
            }
            Err(err) => {
                warn!(%err, "country dictionary fetch failed, using empty list");
                Vec::new()
            }
        };
        ctx.commit(
            "countries",
            serde_json::to_value(countries).unwrap_or_default(),
        )?;
        Ok(Value::Null)
    }
}

#[async_trait]
impl Partition for DictionariesPartition {
    fn namespace(&self) -> &'static str {
        NS_DICTIONARIES
    }

    async fn handle_action(
        &self,
        ctx: Context,
        action: &str,
        payload: Value,
    ) -> Result<Value, StoreError> {
        match action {
            // Both dictionaries load concurrently; each already degrades to
            // an empty list on its own, so bootstrap itself cannot fail.
            "initState" => {
                let (regions, countries) = tokio::join!(
                    ctx.dispatch("fetchRegionsCurrencies", Value::Null),
                    ctx.dispatch("fetchCountries", Value::Null),
                );
                regions?;
                countries?;
                Ok(Value::Null)
            }
            "fetchCurrencies" => self.fetch_currencies(&ctx, payload).await,
            "fetchRegionsCurrencies" => self.fetch_regions_currencies(&ctx).await,
            "fetchCountries" => self.fetch_countries(&ctx).await,
            other => Err(self.unknown_action(other)),
        }
    }

    fn handle_mutation(&self, mutation: &str, payload: Value) -> Result<(), StoreError> {
        match mutation {
            "currencies" => {
                let currencies: Vec<Currency> = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("Dictionaries/currencies", e))?;
                self.state.write().currencies = currencies;
                Ok(())
            }
            "regionsCurrencies" => {
                let regions: Vec<RegionCurrencies> = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("Dictionaries/regionsCurrencies", e))?;
                self.state.write().regions_currencies = regions;
                Ok(())
            }
            "countries" => {
                let countries: Vec<Country> = serde_json::from_value(payload)
                    .map_err(|e| StoreError::payload("Dictionaries/countries", e))?;
                self.state.write().countries = countries;
                Ok(())
            }
            other => Err(self.unknown_mutation(other)),
        }
    }

    fn getter(&self, name: &str) -> Result<Value, StoreError> {
        let state = self.state.read();
        match name {
            // Sorted label/value options for the country selector.
            "countries" => {
                let mut options: Vec<(String, String)> = state
                    .countries
                    .iter()
                    .map(|c| {
                        (
                            self.labels.country_label(&c.iso_code_a2),
                            c.iso_code_a2.clone(),
                        )
                    })
                    .collect();
                options.sort_by(|a, b| a.0.cmp(&b.0));
                Ok(Value::Array(
                    options
                        .into_iter()
                        .map(|(label, value)| json!({ "label": label, "value": value }))
                        .collect(),
                ))
            }
            "currenciesCode" => Ok(Value::Array(
                state
                    .currencies
                    .iter()
                    .map(|c| json!({ "label": c.name.en, "value": c.code_a3 }))
                    .collect(),
            )),
            "currenciesInt" => Ok(Value::Array(
                state
                    .currencies
                    .iter()
                    .filter_map(|c| {
                        c.code_int
                            .map(|code| json!({ "label": c.name.en, "value": code }))
                    })
                    .collect(),
            )),
            "currenciesWithRegions" => Ok(Value::Array(
                state
                    .regions_currencies
                    .iter()
                    .flat_map(|entry| {
                        entry.regions.iter().map(|region| {
                            json!({ "currency": entry.currency, "region": region.region })
                        })
                    })
                    .collect(),
            )),
            other => Err(self.unknown_getter(other)),
        }
    }
}
