//! # Core Domain Entities
//!
//! Defines the entities the state partitions route, merge, and invalidate.
//!
//! ## Clusters
//!
//! - **Merchant**: `Merchant`, `CompanyRecord`, `CompanyForm`
//! - **Project**: `ProjectRecord`, `LocalizedName`, `CurrencyRegionPair`
//! - **Dictionaries**: `Currency`, `Country`, `RegionCurrencies`
//! - **Notifications**: `NotificationEvent`, `Timestamp`

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// CLUSTER A: TIME
// =============================================================================

/// Wire representation of a creation timestamp.
///
/// The API emits timestamps as `{ "seconds": <unix seconds> }`; push events
/// may omit the field entirely, in which case the receiver assigns one from
/// local wall-clock time at receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp {
    /// Unix time in seconds.
    pub seconds: i64,
}

impl Timestamp {
    /// Current wall-clock time, used as the receipt-time fallback.
    #[must_use]
    pub fn now() -> Self {
        Self {
            seconds: chrono::Utc::now().timestamp(),
        }
    }
}

// =============================================================================
// CLUSTER B: MERCHANT
// =============================================================================

/// The authenticated merchant record.
///
/// Seeded by the host session layer at login and replaced wholesale with the
/// server's authoritative copy after a successful company submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Merchant {
    /// Merchant identifier; empty until the session layer seeds the record.
    #[serde(default)]
    pub id: String,
    /// Company profile, absent until onboarding fills it in.
    #[serde(default)]
    pub company: Option<CompanyRecord>,
    /// Per-merchant bearer token for the notification push channel.
    #[serde(default)]
    pub channel_token: String,
}

/// Company profile as it travels on the wire (snake_case).
///
/// Every field defaults to empty so partially filled forms and sparse
/// server records both deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompanyRecord {
    pub address: String,
    pub address_additional: String,
    pub alternative_name: String,
    pub city: String,
    pub country: String,
    pub name: String,
    pub registration_number: String,
    pub state: String,
    pub tax_id: String,
    pub website: String,
    pub zip: String,
}

/// Company profile as the client form layer sees it (camelCase keys).
///
/// Twin of [`CompanyRecord`]. The conversion below maps every field by name
/// in both directions; adding a field to one struct without mapping it is a
/// compile error, so the two representations cannot drift apart silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyForm {
    pub address: String,
    pub address_additional: String,
    pub alternative_name: String,
    pub city: String,
    pub country: String,
    pub name: String,
    pub registration_number: String,
    pub state: String,
    pub tax_id: String,
    pub website: String,
    pub zip: String,
}

impl From<CompanyRecord> for CompanyForm {
    fn from(r: CompanyRecord) -> Self {
        Self {
            address: r.address,
            address_additional: r.address_additional,
            alternative_name: r.alternative_name,
            city: r.city,
            country: r.country,
            name: r.name,
            registration_number: r.registration_number,
            state: r.state,
            tax_id: r.tax_id,
            website: r.website,
            zip: r.zip,
        }
    }
}

impl From<CompanyForm> for CompanyRecord {
    fn from(f: CompanyForm) -> Self {
        Self {
            address: f.address,
            address_additional: f.address_additional,
            alternative_name: f.alternative_name,
            city: f.city,
            country: f.country,
            name: f.name,
            registration_number: f.registration_number,
            state: f.state,
            tax_id: f.tax_id,
            website: f.website,
            zip: f.zip,
        }
    }
}

// =============================================================================
// CLUSTER C: PROJECT
// =============================================================================

/// A name localized per language code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LocalizedName {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub ru: String,
}

/// A merchant project as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProjectRecord {
    /// Absent for records seeded locally and not yet persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: LocalizedName,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub url_check_account: String,
    #[serde(default)]
    pub url_process_payment: String,
    #[serde(default)]
    pub url_redirect_success: String,
    #[serde(default)]
    pub url_redirect_fail: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub create_invoice_allowed_urls: Vec<String>,
    #[serde(default)]
    pub callback_protocol: String,
    #[serde(default)]
    pub min_payment_amount: u64,
    #[serde(default)]
    pub max_payment_amount: u64,
    #[serde(default)]
    pub callback_currency: String,
    #[serde(default)]
    pub limits_currency: String,
    #[serde(default)]
    pub is_products_checkout: bool,
    #[serde(default)]
    pub notify_emails: Vec<String>,
}

/// A currency selection split into its currency and region halves.
///
/// Selections are stored as composite keys (`"USD-EU"`); a key without a
/// region qualifier pairs the currency with itself (`"USD"` → USD/USD).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRegionPair {
    pub currency: String,
    pub region: String,
}

impl CurrencyRegionPair {
    /// Split a composite selection key on the `-` separator.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key.split_once('-') {
            Some((currency, region)) if !region.is_empty() => Self {
                currency: currency.to_string(),
                region: region.to_string(),
            },
            _ => Self {
                currency: key.to_string(),
                region: key.to_string(),
            },
        }
    }
}

// =============================================================================
// CLUSTER D: DICTIONARIES
// =============================================================================

/// A currency dictionary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub name: LocalizedName,
    pub code_a3: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_int: Option<u32>,
}

impl Currency {
    /// Dictionary entry with only a three-letter code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self {
            name: LocalizedName {
                en: code.to_string(),
                ru: String::new(),
            },
            code_a3: code.to_string(),
            code_int: None,
        }
    }
}

/// A country dictionary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub iso_code_a2: String,
}

/// The regions available for one settlement currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCurrencies {
    pub currency: String,
    #[serde(default)]
    pub regions: Vec<CurrencyRegion>,
}

/// One region entry under a settlement currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRegion {
    pub region: String,
}

// =============================================================================
// CLUSTER E: NOTIFICATIONS
// =============================================================================

/// A notification event, fetched historically or delivered over the push
/// channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub id: String,
    /// Opaque domain payload; the state layer routes it, pages render it.
    #[serde(default)]
    pub payload: Value,
    /// May be omitted by the server on push delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub read: bool,
}

impl NotificationEvent {
    /// Assign `received_at` as the creation time if the server omitted one.
    #[must_use]
    pub fn with_received_at(mut self, received_at: Timestamp) -> Self {
        if self.created_at.is_none() {
            self.created_at = Some(received_at);
        }
        self
    }
}
