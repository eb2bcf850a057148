use rusqlite::Connection;
use venuemap_core::db::open_db_in_memory;
use venuemap_core::{
    MapState, SqliteStateRepository, StateRepository, DEFAULT_LAYER_ID, DEFAULT_LAYER_NAME,
    MAP_STATE_KEY,
};

const LEGACY_RECORD: &str = r#"{
    "imageRef": "blob:venue/floor1",
    "markers": [
        {"id": "m1", "x": 12.5, "y": 40.0, "title": "Registration",
         "room": "Lobby", "description": "", "time": "09:00", "category": "info"}
    ]
}"#;

fn put_raw(conn: &Connection, raw: &str) {
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
        rusqlite::params![MAP_STATE_KEY, raw],
    )
    .unwrap();
}

fn stored_value(conn: &Connection) -> String {
    conn.query_row(
        "SELECT value FROM kv_store WHERE key = ?1;",
        [MAP_STATE_KEY],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn legacy_record_migrates_to_single_default_layer() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();

    put_raw(&conn, LEGACY_RECORD);
    let state = repo.load();

    assert_eq!(state.layers.len(), 1);
    let layer = &state.layers[0];
    assert_eq!(layer.id, DEFAULT_LAYER_ID);
    assert_eq!(layer.name, DEFAULT_LAYER_NAME);
    assert_eq!(layer.image_ref, "blob:venue/floor1");
    assert_eq!(state.active_layer_id, DEFAULT_LAYER_ID);

    // Markers are copied verbatim.
    assert_eq!(layer.markers.len(), 1);
    let marker = &layer.markers[0];
    assert_eq!(marker.id, "m1");
    assert_eq!(marker.x, 12.5);
    assert_eq!(marker.y, 40.0);
    assert_eq!(marker.title, "Registration");
    assert_eq!(marker.room, "Lobby");
    assert_eq!(marker.time, "09:00");
    assert_eq!(marker.category, "info");
}

#[test]
fn migration_is_deterministic() {
    let load_once = || {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        put_raw(&conn, LEGACY_RECORD);
        repo.load()
    };

    assert_eq!(load_once(), load_once());
}

#[test]
fn migrated_record_is_persisted_immediately() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();

    put_raw(&conn, LEGACY_RECORD);
    let migrated = repo.load();

    let persisted: serde_json::Value = serde_json::from_str(&stored_value(&conn)).unwrap();
    assert_eq!(persisted["schemaVersion"], 1);
    assert!(persisted.get("layers").is_some());
    // imageRef now lives inside the migrated layer, not at top level.
    assert!(persisted.get("imageRef").is_none());
    assert_eq!(persisted["layers"][0]["imageRef"], "blob:venue/floor1");

    // Re-migrating the output is a no-op: the second load sees the
    // current shape and returns the same state.
    assert_eq!(repo.load(), migrated);
}

#[test]
fn legacy_record_without_markers_migrates_to_empty_marker_list() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();

    put_raw(&conn, r#"{"imageRef": "/map.svg"}"#);
    let state = repo.load();

    assert_eq!(state.layers.len(), 1);
    assert!(state.layers[0].markers.is_empty());
    state.validate().unwrap();
}

#[test]
fn record_with_both_layers_and_image_ref_is_treated_as_current() {
    // Legacy detection requires the absence of `layers`; a stray top-level
    // imageRef next to a layers list must not trigger migration.
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();

    put_raw(
        &conn,
        r#"{
            "imageRef": "stray.svg",
            "layers": [{"id": "a", "name": "A", "imageRef": "a.svg", "markers": []}],
            "activeLayerId": "a"
        }"#,
    );
    let state = repo.load();

    assert_eq!(state.layers.len(), 1);
    assert_eq!(state.layers[0].id, "a");
    assert_eq!(state.active_layer_id, "a");
}

#[test]
fn untagged_current_record_round_trips_and_gains_version_tag_on_save() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();

    put_raw(
        &conn,
        r#"{"layers":[{"id":"a","name":"A","imageRef":"a.svg","markers":[]}],"activeLayerId":"a"}"#,
    );
    let state = repo.load();
    repo.save(&state).unwrap();

    let value: serde_json::Value = serde_json::from_str(&stored_value(&conn)).unwrap();
    assert_eq!(value["schemaVersion"], 1);
    assert_eq!(repo.load(), state);
}

#[test]
fn migrated_state_satisfies_all_invariants() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();

    put_raw(&conn, LEGACY_RECORD);
    repo.load().validate().unwrap();
}

#[test]
fn default_state_is_used_for_null_and_non_object_records() {
    for raw in ["null", "42", "\"just a string\"", "[]"] {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        put_raw(&conn, raw);
        assert_eq!(repo.load(), MapState::default_state(), "record: {raw}");
    }
}
