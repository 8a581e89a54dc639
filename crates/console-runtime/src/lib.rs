//! # Console Runtime
//!
//! Assembles the partition registry from configuration.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then environment overrides)
//! 2. Build the collaborator seams (gateway, push channel, preferences)
//! 3. Register every partition with the root store
//! 4. Bootstrap the session partitions (`User.Merchant`, `Dictionaries`,
//!    `User.Notifications`) with their arguments
//!
//! Page-scoped partitions (`Project`, `PaymentMethod`,
//! `User.Merchant.AccountInfo`) are bootstrapped later by the page layer,
//! once per page view, with page-specific arguments.

pub mod config;
pub mod wiring;

pub use config::ConsoleConfig;
pub use wiring::{assemble_store, live_store};
