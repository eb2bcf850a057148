//! Map domain model: layers, markers and whole-map state.
//!
//! # Responsibility
//! - Define the canonical shapes persisted by the state repository.
//! - Provide the default state and active-layer resolution.
//! - Validate whole-state invariants for callers that need them.
//!
//! # Invariants
//! - A valid `MapState` always has at least one layer.
//! - `active_layer_id` always resolves to an existing layer.
//! - Marker ids are unique within their owning layer (not across layers).
//! - Marker positions are percentages in `[0, 100]`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Layer id used by the default state and by legacy-record migration.
pub const DEFAULT_LAYER_ID: &str = "default";
/// Layer name used by the default state and by legacy-record migration.
pub const DEFAULT_LAYER_NAME: &str = "Main Map";
/// Image reference of the default layer when nothing was ever uploaded.
pub const DEFAULT_IMAGE_REF: &str = "/map.svg";

/// Inclusive bounds for marker percentage coordinates.
pub const POSITION_MIN: f64 = 0.0;
pub const POSITION_MAX: f64 = 100.0;

/// Point annotation on a layer, positioned by percentage coordinates.
///
/// `title` is the only semantically required field; the remaining event
/// metadata defaults to empty strings so sparse persisted records decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Short id, unique within the owning layer.
    pub id: String,
    /// Horizontal position as a percentage of the layer image width.
    pub x: f64,
    /// Vertical position as a percentage of the layer image height.
    pub y: f64,
    pub title: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub category: String,
}

/// Named background image plus its ordered markers.
///
/// `image_ref` is an opaque reference supplied by the upload collaborator;
/// the store never dereferences or validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    #[serde(rename = "imageRef")]
    pub image_ref: String,
    /// Insertion order; there is no reordering operation.
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl Layer {
    /// Creates an empty layer with the given identity and image.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_ref: image_ref.into(),
            markers: Vec::new(),
        }
    }
}

/// Whole persisted map state: ordered layers plus the active selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    pub layers: Vec<Layer>,
    #[serde(rename = "activeLayerId")]
    pub active_layer_id: String,
}

impl MapState {
    /// Returns the state used when nothing was persisted yet or the persisted
    /// record is unusable. Never persisted automatically.
    pub fn default_state() -> Self {
        Self {
            layers: vec![Layer::new(
                DEFAULT_LAYER_ID,
                DEFAULT_LAYER_NAME,
                DEFAULT_IMAGE_REF,
            )],
            active_layer_id: DEFAULT_LAYER_ID.to_string(),
        }
    }

    /// Resolves the active layer, falling back to the first layer when
    /// `active_layer_id` does not resolve.
    ///
    /// Returns `None` only for a state with no layers at all, which a valid
    /// state never is.
    pub fn active_layer(&self) -> Option<&Layer> {
        self.layers
            .iter()
            .find(|layer| layer.id == self.active_layer_id)
            .or_else(|| self.layers.first())
    }

    /// Returns whether `id` names an existing layer.
    pub fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|layer| layer.id == id)
    }

    /// Checks the whole-state invariants.
    ///
    /// Mutation operations preserve these by construction; `validate` exists
    /// for callers (and tests) that want an explicit check on states obtained
    /// from elsewhere.
    pub fn validate(&self) -> Result<(), StateValidationError> {
        if self.layers.is_empty() {
            return Err(StateValidationError::NoLayers);
        }
        if !self.has_layer(&self.active_layer_id) {
            return Err(StateValidationError::DanglingActiveLayer {
                active_layer_id: self.active_layer_id.clone(),
            });
        }
        for layer in &self.layers {
            let mut seen = HashSet::new();
            for marker in &layer.markers {
                if !seen.insert(marker.id.as_str()) {
                    return Err(StateValidationError::DuplicateMarkerId {
                        layer_id: layer.id.clone(),
                        marker_id: marker.id.clone(),
                    });
                }
                if !position_in_range(marker.x) || !position_in_range(marker.y) {
                    return Err(StateValidationError::PositionOutOfRange {
                        layer_id: layer.id.clone(),
                        marker_id: marker.id.clone(),
                        x: marker.x,
                        y: marker.y,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Returns whether a single percentage coordinate is valid.
///
/// NaN compares false on both bounds and is rejected.
pub fn position_in_range(value: f64) -> bool {
    value >= POSITION_MIN && value <= POSITION_MAX
}

/// Semantic violation of a whole-state invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum StateValidationError {
    NoLayers,
    DanglingActiveLayer {
        active_layer_id: String,
    },
    DuplicateMarkerId {
        layer_id: String,
        marker_id: String,
    },
    PositionOutOfRange {
        layer_id: String,
        marker_id: String,
        x: f64,
        y: f64,
    },
}

impl Display for StateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLayers => write!(f, "map state has no layers"),
            Self::DanglingActiveLayer { active_layer_id } => {
                write!(f, "active layer id `{active_layer_id}` does not resolve")
            }
            Self::DuplicateMarkerId {
                layer_id,
                marker_id,
            } => write!(f, "duplicate marker id `{marker_id}` in layer `{layer_id}`"),
            Self::PositionOutOfRange {
                layer_id,
                marker_id,
                x,
                y,
            } => write!(
                f,
                "marker `{marker_id}` in layer `{layer_id}` has position ({x}, {y}) outside [0, 100]"
            ),
        }
    }
}

impl Error for StateValidationError {}
