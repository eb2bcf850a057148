//! Persistence adapter over the pure transition layer.
//!
//! # Responsibility
//! - Apply a pure transition and persist the result in one call, so callers
//!   never forget the save that must follow every mutation.
//!
//! # Invariants
//! - The adapter holds no state of its own; the caller owns the current
//!   `MapState` between load and the next mutation.
//! - Unchanged results (rejected inputs) are not re-persisted.

use crate::model::map::MapState;
use crate::repo::state_repo::{RepoResult, StateRepository};
use crate::service::layer_ops;
use crate::service::marker_ops::{self, MarkerFields, MarkerPatch};
use log::info;

/// Thin adapter binding transitions to a repository.
pub struct MapService<R: StateRepository> {
    repo: R,
}

impl<R: StateRepository> MapService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the persisted state (or the default state; see the repository
    /// contract).
    pub fn load(&self) -> MapState {
        self.repo.load()
    }

    /// Adds a layer and makes it active.
    pub fn add_layer(&self, state: &MapState, name: &str, image_ref: &str) -> RepoResult<MapState> {
        self.commit("layer_add", state, layer_ops::add_layer(state, name, image_ref))
    }

    /// Removes a layer; the last remaining layer is protected.
    pub fn remove_layer(&self, state: &MapState, id: &str) -> RepoResult<MapState> {
        self.commit("layer_remove", state, layer_ops::remove_layer(state, id))
    }

    /// Renames a layer; empty names are rejected.
    pub fn rename_layer(&self, state: &MapState, id: &str, new_name: &str) -> RepoResult<MapState> {
        self.commit(
            "layer_rename",
            state,
            layer_ops::rename_layer(state, id, new_name),
        )
    }

    /// Switches the active layer; unknown ids are rejected.
    pub fn switch_active_layer(&self, state: &MapState, id: &str) -> RepoResult<MapState> {
        self.commit(
            "layer_switch",
            state,
            layer_ops::switch_active_layer(state, id),
        )
    }

    /// Replaces a layer's background image reference.
    pub fn replace_layer_image(
        &self,
        state: &MapState,
        layer_id: &str,
        image_ref: &str,
    ) -> RepoResult<MapState> {
        self.commit(
            "layer_replace_image",
            state,
            layer_ops::replace_layer_image(state, layer_id, image_ref),
        )
    }

    /// Adds a marker to a layer; invalid titles and positions are rejected.
    pub fn add_marker(
        &self,
        state: &MapState,
        layer_id: &str,
        x: f64,
        y: f64,
        fields: &MarkerFields,
    ) -> RepoResult<MapState> {
        self.commit(
            "marker_add",
            state,
            marker_ops::add_marker(state, layer_id, x, y, fields),
        )
    }

    /// Merges a partial update into an existing marker.
    pub fn update_marker(
        &self,
        state: &MapState,
        layer_id: &str,
        marker_id: &str,
        patch: &MarkerPatch,
    ) -> RepoResult<MapState> {
        self.commit(
            "marker_update",
            state,
            marker_ops::update_marker(state, layer_id, marker_id, patch),
        )
    }

    /// Deletes a marker by id.
    pub fn delete_marker(
        &self,
        state: &MapState,
        layer_id: &str,
        marker_id: &str,
    ) -> RepoResult<MapState> {
        self.commit(
            "marker_delete",
            state,
            marker_ops::delete_marker(state, layer_id, marker_id),
        )
    }

    fn commit(&self, event: &str, before: &MapState, next: MapState) -> RepoResult<MapState> {
        if next == *before {
            info!("event={event} module=service status=noop");
            return Ok(next);
        }

        self.repo.save(&next)?;
        info!(
            "event={event} module=service status=ok layers={} active_layer={}",
            next.layers.len(),
            next.active_layer_id
        );
        Ok(next)
    }
}
