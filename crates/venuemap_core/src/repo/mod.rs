//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the whole-state persistence contract.
//! - Isolate SQLite and record-versioning details from the pure transition
//!   layer.
//!
//! # Invariants
//! - Record migrations happen on load, before any caller sees the state.
//! - Repository APIs return semantic errors in addition to DB transport
//!   errors.

pub mod record;
pub mod state_repo;
