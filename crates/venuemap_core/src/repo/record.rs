//! Persisted record encoding and version migrations.
//!
//! # Responsibility
//! - Encode the map state as a JSON record tagged with an explicit
//!   `schemaVersion`.
//! - Detect the version of untagged historical records and upgrade them
//!   through the migration table until they reach the current version.
//!
//! # Invariants
//! - Migrations are pure and deterministic; the same input record always
//!   produces the same output record.
//! - Re-running the pipeline on an upgraded record is a no-op because the
//!   output is never shaped like an older version.
//! - Unknown or future-versioned records are reported as unusable, never
//!   partially decoded.

use crate::model::map::{MapState, DEFAULT_LAYER_ID, DEFAULT_LAYER_NAME};
use serde_json::{json, Map, Value};

/// Version written into every record persisted by this binary.
pub const CURRENT_RECORD_VERSION: u32 = 1;

/// Field carrying the explicit version tag on persisted records.
pub const VERSION_FIELD: &str = "schemaVersion";

/// Outcome of decoding a raw persisted record.
#[derive(Debug)]
pub enum DecodedRecord {
    /// Record was already at the current version.
    Current(MapState),
    /// Record was upgraded from an older version and should be re-persisted.
    Migrated { state: MapState, from_version: u32 },
    /// Record cannot be used; callers fall back to the default state.
    Unusable { reason: &'static str },
}

struct RecordMigration {
    from: u32,
    apply: fn(&Map<String, Value>) -> Option<Value>,
}

/// Keyed by source version; applied repeatedly until the record reaches
/// [`CURRENT_RECORD_VERSION`].
const RECORD_MIGRATIONS: &[RecordMigration] = &[RecordMigration {
    from: 0,
    apply: migrate_v0_to_v1,
}];

/// Decodes a raw JSON record, upgrading older versions as needed.
pub fn decode_record(raw: &str) -> DecodedRecord {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return DecodedRecord::Unusable { reason: "not_json" },
    };

    let Some(mut fields) = into_object(value) else {
        return DecodedRecord::Unusable {
            reason: "not_an_object",
        };
    };

    let Some(original_version) = detect_version(&fields) else {
        return DecodedRecord::Unusable {
            reason: "unknown_shape",
        };
    };
    if original_version > CURRENT_RECORD_VERSION {
        return DecodedRecord::Unusable {
            reason: "future_version",
        };
    }

    let mut version = original_version;
    while version < CURRENT_RECORD_VERSION {
        let Some(migration) = RECORD_MIGRATIONS
            .iter()
            .find(|migration| migration.from == version)
        else {
            return DecodedRecord::Unusable {
                reason: "missing_migration",
            };
        };
        let Some(upgraded) = (migration.apply)(&fields) else {
            return DecodedRecord::Unusable {
                reason: "migration_failed",
            };
        };
        let Some(upgraded_fields) = into_object(upgraded) else {
            return DecodedRecord::Unusable {
                reason: "migration_failed",
            };
        };
        fields = upgraded_fields;
        version += 1;
    }

    // The version tag is not part of the in-memory model.
    fields.remove(VERSION_FIELD);
    let state: MapState = match serde_json::from_value(Value::Object(fields)) {
        Ok(state) => state,
        Err(_) => {
            return DecodedRecord::Unusable {
                reason: "malformed_record",
            }
        }
    };

    if original_version < CURRENT_RECORD_VERSION {
        DecodedRecord::Migrated {
            state,
            from_version: original_version,
        }
    } else {
        DecodedRecord::Current(state)
    }
}

/// Serializes a state as the current record shape with an explicit version tag.
pub fn encode_record(state: &MapState) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(state)?;
    if let Value::Object(fields) = &mut value {
        fields.insert(VERSION_FIELD.to_string(), json!(CURRENT_RECORD_VERSION));
    }
    serde_json::to_string(&value)
}

/// Determines the record version.
///
/// Records written by this binary carry an explicit tag. Untagged records
/// predate the tag: a record with `layers` is the first multi-layer shape
/// (v1); a record with `imageRef` and no `layers` is the single-layer legacy
/// shape (v0); anything else is unrecognizable.
fn detect_version(fields: &Map<String, Value>) -> Option<u32> {
    if let Some(tag) = fields.get(VERSION_FIELD) {
        return tag.as_u64().and_then(|v| u32::try_from(v).ok());
    }
    if fields.contains_key("layers") {
        return Some(1);
    }
    if fields.contains_key("imageRef") {
        return Some(0);
    }
    None
}

/// v0 -> v1: wrap the single implicit layer into the multi-layer shape.
///
/// The image reference and markers are copied verbatim; the produced layer
/// uses the well-known default id and name, which also becomes the active
/// layer.
fn migrate_v0_to_v1(fields: &Map<String, Value>) -> Option<Value> {
    let image_ref = fields.get("imageRef")?.clone();
    let markers = fields.get("markers").cloned().unwrap_or_else(|| json!([]));

    Some(json!({
        "layers": [{
            "id": DEFAULT_LAYER_ID,
            "name": DEFAULT_LAYER_NAME,
            "imageRef": image_ref,
            "markers": markers,
        }],
        "activeLayerId": DEFAULT_LAYER_ID,
    }))
}

fn into_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(fields) => Some(fields),
        _ => None,
    }
}
