use venuemap_core::service::layer_ops::add_layer;
use venuemap_core::service::marker_ops::{add_marker, delete_marker, update_marker};
use venuemap_core::{MapState, MarkerFields, MarkerPatch, DEFAULT_LAYER_ID};

fn fields(title: &str) -> MarkerFields {
    MarkerFields {
        title: title.to_string(),
        ..MarkerFields::default()
    }
}

#[test]
fn add_marker_appends_in_insertion_order() {
    let state = MapState::default_state();
    let state = add_marker(&state, DEFAULT_LAYER_ID, 10.0, 20.0, &fields("Opening"));
    let state = add_marker(&state, DEFAULT_LAYER_ID, 30.0, 40.0, &fields("Lunch"));

    let markers = &state.layers[0].markers;
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].title, "Opening");
    assert_eq!(markers[1].title, "Lunch");
    assert_ne!(markers[0].id, markers[1].id);
    state.validate().unwrap();
}

#[test]
fn add_marker_with_blank_title_is_rejected() {
    let state = MapState::default_state();
    let next = add_marker(&state, DEFAULT_LAYER_ID, 50.0, 50.0, &fields(""));
    assert_eq!(next.layers[0].markers.len(), 0);
    assert_eq!(next, state);

    let next = add_marker(&state, DEFAULT_LAYER_ID, 50.0, 50.0, &fields("   "));
    assert_eq!(next, state);
}

#[test]
fn add_marker_outside_percentage_bounds_is_rejected() {
    let state = MapState::default_state();
    for (x, y) in [
        (-0.1, 50.0),
        (100.1, 50.0),
        (50.0, -1.0),
        (50.0, 101.0),
        (f64::NAN, 50.0),
    ] {
        let next = add_marker(&state, DEFAULT_LAYER_ID, x, y, &fields("Edge"));
        assert_eq!(next, state, "position ({x}, {y}) should be rejected");
    }

    // Bounds themselves are valid.
    let next = add_marker(&state, DEFAULT_LAYER_ID, 0.0, 100.0, &fields("Corner"));
    assert_eq!(next.layers[0].markers.len(), 1);
}

#[test]
fn add_marker_to_unknown_layer_is_a_noop() {
    let state = MapState::default_state();
    let next = add_marker(&state, "ghost", 50.0, 50.0, &fields("Lost"));
    assert_eq!(next, state);
}

#[test]
fn update_merges_only_present_fields() {
    let state = MapState::default_state();
    let state = add_marker(
        &state,
        DEFAULT_LAYER_ID,
        50.0,
        50.0,
        &MarkerFields {
            title: "Hack Night".to_string(),
            room: "Hall A".to_string(),
            time: "19:00".to_string(),
            ..MarkerFields::default()
        },
    );
    let marker_id = state.layers[0].markers[0].id.clone();

    let patch = MarkerPatch {
        room: Some("Lab 3".to_string()),
        ..MarkerPatch::default()
    };
    let next = update_marker(&state, DEFAULT_LAYER_ID, &marker_id, &patch);

    let marker = &next.layers[0].markers[0];
    assert_eq!(marker.room, "Lab 3");
    assert_eq!(marker.title, "Hack Night");
    assert_eq!(marker.time, "19:00");
    assert_eq!(marker.x, 50.0);
}

#[test]
fn update_unknown_marker_is_a_noop() {
    let state = add_marker(
        &MapState::default_state(),
        DEFAULT_LAYER_ID,
        50.0,
        50.0,
        &fields("Keep"),
    );
    let patch = MarkerPatch {
        title: Some("Changed".to_string()),
        ..MarkerPatch::default()
    };
    assert_eq!(
        update_marker(&state, DEFAULT_LAYER_ID, "ghost", &patch),
        state
    );
    assert_eq!(update_marker(&state, "ghost-layer", "ghost", &patch), state);
}

#[test]
fn update_rejects_out_of_range_position_and_blank_title() {
    let state = add_marker(
        &MapState::default_state(),
        DEFAULT_LAYER_ID,
        50.0,
        50.0,
        &fields("Fixed"),
    );
    let marker_id = state.layers[0].markers[0].id.clone();

    let bad_position = MarkerPatch {
        x: Some(120.0),
        ..MarkerPatch::default()
    };
    assert_eq!(
        update_marker(&state, DEFAULT_LAYER_ID, &marker_id, &bad_position),
        state
    );

    let blank_title = MarkerPatch {
        title: Some("  ".to_string()),
        ..MarkerPatch::default()
    };
    assert_eq!(
        update_marker(&state, DEFAULT_LAYER_ID, &marker_id, &blank_title),
        state
    );
}

#[test]
fn delete_removes_by_id_and_is_noop_when_absent() {
    let state = MapState::default_state();
    let state = add_marker(&state, DEFAULT_LAYER_ID, 10.0, 10.0, &fields("A"));
    let state = add_marker(&state, DEFAULT_LAYER_ID, 20.0, 20.0, &fields("B"));
    let first_id = state.layers[0].markers[0].id.clone();

    let next = delete_marker(&state, DEFAULT_LAYER_ID, &first_id);
    assert_eq!(next.layers[0].markers.len(), 1);
    assert_eq!(next.layers[0].markers[0].title, "B");

    assert_eq!(delete_marker(&next, DEFAULT_LAYER_ID, "ghost"), next);
}

#[test]
fn markers_are_scoped_to_their_layer() {
    let state = add_layer(&MapState::default_state(), "Floor 2", "floor2.svg");
    let floor2 = state.layers[1].id.clone();

    let state = add_marker(&state, &floor2, 50.0, 50.0, &fields("Upstairs"));
    assert_eq!(state.layers[0].markers.len(), 0);
    assert_eq!(state.layers[1].markers.len(), 1);

    // Deleting through the wrong layer id does not touch the marker.
    let marker_id = state.layers[1].markers[0].id.clone();
    let next = delete_marker(&state, DEFAULT_LAYER_ID, &marker_id);
    assert_eq!(next, state);
}
