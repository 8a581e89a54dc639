//! # Pay-Console Test Suite
//!
//! Unified test crate for cross-partition behavior.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs          # Bootstrap + coordinator sequences across partitions
//!     └── notifications.rs  # Push channel delivery, ordering, watch guard
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p console-tests
//!
//! # By category
//! cargo test -p console-tests integration::flows
//! cargo test -p console-tests integration::notifications
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
