//! # Console Partitions - Domain State Partitions
//!
//! The six namespaced partitions of the console state tree:
//!
//! | Namespace                  | Partition                | Concern |
//! |----------------------------|--------------------------|---------|
//! | `User.Merchant`            | [`MerchantPartition`]    | Authenticated merchant record, onboarding steps |
//! | `User.Merchant.AccountInfo`| [`AccountInfoPartition`] | Company profile form + submit coordinator |
//! | `User.Notifications`       | [`NotificationsPartition`]| Ordered notification feed + push watch |
//! | `Dictionaries`             | [`DictionariesPartition`]| Currencies, countries, region pairings |
//! | `Project`                  | [`ProjectPartition`]     | Project record, currency selections, SKU checks |
//! | `PaymentMethod`            | [`PaymentMethodPartition`]| Per-merchant payment method record |
//!
//! Every partition follows the same template and talks to its collaborators
//! only through the seams: the gateway trait, the push-channel trait, the
//! preference store, and root-scoped calls via the store context. No
//! partition holds a reference to another partition.

pub mod account_info;
pub mod dictionaries;
pub mod merchant;
pub mod notifications;
pub mod payment_method;
pub mod project;

pub use account_info::AccountInfoPartition;
pub use dictionaries::{DictionariesPartition, IsoLabels, LabelProvider};
pub use merchant::MerchantPartition;
pub use notifications::NotificationsPartition;
pub use payment_method::PaymentMethodPartition;
pub use project::ProjectPartition;

/// Namespace of the merchant partition.
pub const NS_MERCHANT: &str = "User.Merchant";
/// Namespace of the account-info partition.
pub const NS_ACCOUNT_INFO: &str = "User.Merchant.AccountInfo";
/// Namespace of the notifications partition.
pub const NS_NOTIFICATIONS: &str = "User.Notifications";
/// Namespace of the dictionaries partition.
pub const NS_DICTIONARIES: &str = "Dictionaries";
/// Namespace of the project partition.
pub const NS_PROJECT: &str = "Project";
/// Namespace of the payment-method partition.
pub const NS_PAYMENT_METHOD: &str = "PaymentMethod";
