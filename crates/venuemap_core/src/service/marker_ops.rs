//! Pure marker transitions, scoped to a layer.
//!
//! # Responsibility
//! - Implement marker CRUD as pure functions `(state, ...) -> state`.
//!
//! # Invariants
//! - Every function returns a new state; inputs are never mutated.
//! - Rejected inputs produce a state equal to the input (no-op), never an
//!   error or panic.
//! - Marker positions stay within `[0, 100]` after every transition.
//! - Marker order is insertion order; no transition reorders markers.

use crate::model::ids::next_id;
use crate::model::map::{position_in_range, MapState, Marker};

/// Event metadata for a new marker. Only `title` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerFields {
    pub title: String,
    pub room: String,
    pub description: String,
    pub time: String,
    pub category: String,
}

/// Partial update for an existing marker; absent fields are preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub title: Option<String>,
    pub room: Option<String>,
    pub description: Option<String>,
    pub time: Option<String>,
    pub category: Option<String>,
}

/// Appends a marker with a fresh id to the targeted layer.
///
/// Rejected (no-op) when the title is empty after trimming, when `x` or `y`
/// fall outside `[0, 100]`, or when the layer is unknown.
pub fn add_marker(
    state: &MapState,
    layer_id: &str,
    x: f64,
    y: f64,
    fields: &MarkerFields,
) -> MapState {
    if fields.title.trim().is_empty() || !position_in_range(x) || !position_in_range(y) {
        return state.clone();
    }

    let mut next = state.clone();
    for layer in &mut next.layers {
        if layer.id == layer_id {
            layer.markers.push(Marker {
                id: next_id(),
                x,
                y,
                title: fields.title.clone(),
                room: fields.room.clone(),
                description: fields.description.clone(),
                time: fields.time.clone(),
                category: fields.category.clone(),
            });
        }
    }
    next
}

/// Merges the present patch fields into an existing marker.
///
/// Rejected (no-op) when the marker is not found, when a patched position
/// leaves `[0, 100]`, or when the patch would blank the title.
pub fn update_marker(
    state: &MapState,
    layer_id: &str,
    marker_id: &str,
    patch: &MarkerPatch,
) -> MapState {
    if let Some(x) = patch.x {
        if !position_in_range(x) {
            return state.clone();
        }
    }
    if let Some(y) = patch.y {
        if !position_in_range(y) {
            return state.clone();
        }
    }
    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            return state.clone();
        }
    }

    let mut next = state.clone();
    for layer in &mut next.layers {
        if layer.id != layer_id {
            continue;
        }
        for marker in &mut layer.markers {
            if marker.id != marker_id {
                continue;
            }
            if let Some(x) = patch.x {
                marker.x = x;
            }
            if let Some(y) = patch.y {
                marker.y = y;
            }
            if let Some(title) = &patch.title {
                marker.title = title.clone();
            }
            if let Some(room) = &patch.room {
                marker.room = room.clone();
            }
            if let Some(description) = &patch.description {
                marker.description = description.clone();
            }
            if let Some(time) = &patch.time {
                marker.time = time.clone();
            }
            if let Some(category) = &patch.category {
                marker.category = category.clone();
            }
        }
    }
    next
}

/// Removes a marker by id from the targeted layer. No-op when not found.
pub fn delete_marker(state: &MapState, layer_id: &str, marker_id: &str) -> MapState {
    let mut next = state.clone();
    for layer in &mut next.layers {
        if layer.id == layer_id {
            layer.markers.retain(|marker| marker.id != marker_id);
        }
    }
    next
}
