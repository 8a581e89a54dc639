//! # Shared Types Crate
//!
//! Domain entities and wire envelopes shared across the console crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-partition types are defined here.
//! - **Wire Fidelity**: Serde representations match the REST contract
//!   exactly (snake_case bodies, `{ items: [...] }` list envelopes,
//!   `{ code, message }` error bodies).
//! - **Explicit Mapping**: The client-side `CompanyForm` and the wire
//!   `CompanyRecord` are twin structs with a field-by-field conversion; no
//!   runtime case transform exists anywhere in the workspace.

pub mod entities;
pub mod envelope;

pub use entities::*;
pub use envelope::*;
