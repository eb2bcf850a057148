//! Domain model for the map state store.
//!
//! # Responsibility
//! - Define the canonical layer/marker/state shapes used by core logic.
//! - Keep id generation and invariant validation next to the data they govern.
//!
//! # Invariants
//! - Model types carry the persisted wire shape (`imageRef`, `activeLayerId`)
//!   via serde renames; field names stay idiomatic Rust in code.

pub mod ids;
pub mod map;
