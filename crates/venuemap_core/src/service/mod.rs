//! Core use-case services.
//!
//! # Responsibility
//! - Express every mutation as a pure state transition, unit-testable without
//!   any storage dependency.
//! - Provide a thin adapter that persists each transition result.
//!
//! # Invariants
//! - Transition functions never touch storage; only `MapService` does.

pub mod layer_ops;
pub mod map_service;
pub mod marker_ops;
