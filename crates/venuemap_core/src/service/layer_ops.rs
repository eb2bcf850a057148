//! Pure layer transitions.
//!
//! # Responsibility
//! - Implement layer CRUD as pure functions `(state, ...) -> state`.
//!
//! # Invariants
//! - Every function returns a new state; inputs are never mutated.
//! - Rejected inputs produce a state equal to the input (no-op), never an
//!   error or panic.
//! - The layer list stays non-empty and `active_layer_id` stays resolvable
//!   after every transition.

use crate::model::ids::next_id;
use crate::model::map::{Layer, MapState};

/// Appends a fresh empty layer and makes it active. Always succeeds.
pub fn add_layer(state: &MapState, name: &str, image_ref: &str) -> MapState {
    let layer = Layer::new(next_id(), name, image_ref);
    let mut next = state.clone();
    next.active_layer_id = layer.id.clone();
    next.layers.push(layer);
    next
}

/// Removes a layer by id.
///
/// No-op when the id is unknown or when it names the last remaining layer.
/// When the removed layer was active, the first remaining layer (list order)
/// becomes active.
pub fn remove_layer(state: &MapState, id: &str) -> MapState {
    if state.layers.len() <= 1 || !state.has_layer(id) {
        return state.clone();
    }

    let remaining: Vec<Layer> = state
        .layers
        .iter()
        .filter(|layer| layer.id != id)
        .cloned()
        .collect();
    let active_layer_id = if state.active_layer_id == id {
        // remaining is non-empty because layers.len() > 1 held above.
        remaining[0].id.clone()
    } else {
        state.active_layer_id.clone()
    };

    MapState {
        layers: remaining,
        active_layer_id,
    }
}

/// Renames a layer, storing the trimmed name.
///
/// No-op when the trimmed name is empty or the id is unknown.
pub fn rename_layer(state: &MapState, id: &str, new_name: &str) -> MapState {
    let trimmed = new_name.trim();
    if trimmed.is_empty() {
        return state.clone();
    }

    let mut next = state.clone();
    for layer in &mut next.layers {
        if layer.id == id {
            layer.name = trimmed.to_string();
        }
    }
    next
}

/// Makes an existing layer active.
///
/// Unknown ids are rejected (no-op) so `active_layer_id` never dangles.
pub fn switch_active_layer(state: &MapState, id: &str) -> MapState {
    if !state.has_layer(id) {
        return state.clone();
    }

    let mut next = state.clone();
    next.active_layer_id = id.to_string();
    next
}

/// Replaces only the image reference of the targeted layer.
///
/// The reference is stored verbatim; the store never dereferences it.
/// No-op when the id is unknown.
pub fn replace_layer_image(state: &MapState, layer_id: &str, image_ref: &str) -> MapState {
    let mut next = state.clone();
    for layer in &mut next.layers {
        if layer.id == layer_id {
            layer.image_ref = image_ref.to_string();
        }
    }
    next
}
