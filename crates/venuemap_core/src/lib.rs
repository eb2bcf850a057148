//! Core domain logic for the venue map marker store.
//! This crate is the single source of truth for map-state invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::ids::next_id;
pub use model::map::{
    Layer, MapState, Marker, StateValidationError, DEFAULT_IMAGE_REF, DEFAULT_LAYER_ID,
    DEFAULT_LAYER_NAME,
};
pub use repo::record::CURRENT_RECORD_VERSION;
pub use repo::state_repo::{
    RepoError, RepoResult, SqliteStateRepository, StateRepository, MAP_STATE_KEY,
};
pub use service::map_service::MapService;
pub use service::marker_ops::{MarkerFields, MarkerPatch};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
