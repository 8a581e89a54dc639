//! # Console Store - Partition Registry / Root Store
//!
//! Composes independently namespaced state partitions into a single
//! addressable tree and resolves root-scoped action/mutation calls.
//!
//! ## Architecture Rules
//!
//! - **All cross-partition effects go through the root store.** A partition
//!   never holds a reference to another partition; it dispatches by full
//!   path (`User.Merchant/changeMerchant`) through its [`Context`].
//! - **Mutators are the only state writers.** Actions are async and may
//!   call the gateway; mutations are synchronous whole-field replacement.
//! - **Path resolution fails fast.** A missing namespace or operation is a
//!   configuration error surfaced as [`StoreError`], never a silent no-op.
//!
//! ```text
//! ┌──────────────┐                        ┌──────────────┐
//! │ Partition A  │                        │ Partition B  │
//! │              │  dispatch_root(B/op)   │              │
//! │              │ ──────┐                │              │
//! └──────────────┘       │                └──────────────┘
//!                        ▼                        ↑
//!                  ┌──────────────┐               │
//!                  │  RootStore   │ ──────────────┘
//!                  │  (registry)  │   resolve + invoke
//!                  └──────────────┘
//! ```
//!
//! The registry itself holds no domain state; it owns only the namespace
//! table, the root error sink, and the uniform bootstrap entrypoint.

mod error;
mod partition;
mod prefs;
mod root;
mod sink;

pub use error::StoreError;
pub use partition::Partition;
pub use prefs::{FilePrefStore, MemoryPrefStore, PrefStore};
pub use root::{Context, RootStore, RootStoreBuilder};
pub use sink::{CapturingErrorSink, ErrorSink, PageErrorSink};

/// Name of the bootstrap action every partition exposes.
pub const INIT_STATE: &str = "initState";
