//! Integration tests for the ViewerCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use dimviewer_lib::command::{execute_json, execute_json_batch};
use dimviewer_lib::harness::TestHarness;

const MEASURE_SCRIPT: &str = r#"[
    {"command": "enable"},
    {"command": "click", "point": [-0.5, 1.0, 0.0]},
    {"command": "move", "point": [0.2, 1.0, 0.0]},
    {"command": "click", "point": [0.5, 1.0, 0.0]}
]"#;

#[test]
fn test_command_measure_script() {
    let mut h = TestHarness::new();
    let responses = execute_json_batch(&mut h, MEASURE_SCRIPT).unwrap();
    assert_eq!(responses.len(), 4);
    assert!(responses.iter().all(|r| r.success));

    let first = responses[1].data.as_ref().unwrap();
    assert_eq!(first["outcome"], "first_point");
    let commit = responses[3].data.as_ref().unwrap();
    assert_eq!(commit["outcome"], "committed");
    assert!(commit["id"].as_str().is_some());
    assert_eq!(h.measurement_count(), 1);
}

#[test]
fn test_command_inspect_after_measure() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, MEASURE_SCRIPT).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["measurement_count"], 1);
    assert_eq!(data["tool_state"], "Idle");
    assert_eq!(data["history"]["length"], 2);
    assert_eq!(data["history"]["kinds"][1], "dimension_add");
    let distance = data["measurements"][0]["distance"].as_f64().unwrap();
    assert!((distance - 1.0).abs() < 1e-3);
}

#[test]
fn test_command_select_delete_undo() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, MEASURE_SCRIPT).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "select", "point": [0.0, 1.0, 0.0]}"#).unwrap();
    assert!(resp.data.unwrap()["selected"].is_string());

    let resp = execute_json(&mut h, r#"{"command": "delete_selected"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["deleted"], true);
    assert_eq!(h.measurement_count(), 0);

    let resp = execute_json(&mut h, r#"{"command": "undo"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["undone"], true);
    assert_eq!(h.measurement_count(), 1);

    let resp = execute_json(&mut h, r#"{"command": "redo"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["redone"], true);
    assert_eq!(h.measurement_count(), 0);
}

#[test]
fn test_command_delete_without_selection() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "delete_selected"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["deleted"], false);
}

#[test]
fn test_command_undo_at_baseline_is_noop() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "undo"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["undone"], false);
    let resp = execute_json(&mut h, r#"{"command": "redo"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["redone"], false);
}

#[test]
fn test_command_orthogonal_scenario() {
    let mut h = TestHarness::new();
    let script = r#"[
        {"command": "enable"},
        {"command": "set_orthogonal", "enabled": true},
        {"command": "click", "point": [-0.6, 1.0, 0.6]},
        {"command": "click", "point": [-0.55, 1.0, -0.6]}
    ]"#;
    execute_json_batch(&mut h, script).unwrap();
    let m = &h.measurements()[0];
    assert_eq!(m.start[0], m.end[0]);
    assert_eq!(m.start[1], m.end[1]);
    assert!((m.distance - 1.2).abs() < 1e-3);
}

#[test]
fn test_command_alignment_needs_reference_click() {
    let mut h = TestHarness::new();
    let script = r#"[
        {"command": "enable"},
        {"command": "set_alignment", "mode": "parallel"},
        {"command": "click", "point": [0.0, 1.0, 0.9]}
    ]"#;
    let responses = execute_json_batch(&mut h, script).unwrap();
    assert_eq!(responses[2].data.as_ref().unwrap()["outcome"], "reference_edge");

    let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["tool_state"], "Idle");
}

#[test]
fn test_command_clear_and_cancel() {
    let mut h = TestHarness::new();
    execute_json_batch(&mut h, MEASURE_SCRIPT).unwrap();
    execute_json(&mut h, r#"{"command": "click", "point": [0.0, 1.0, 0.5]}"#).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "cancel"}"#).unwrap();
    assert!(resp.success);
    let resp = execute_json(&mut h, r#"{"command": "clear"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["removed"], 1);
    assert_eq!(h.measurement_count(), 0);
}

#[test]
fn test_command_invalid_json() {
    let mut h = TestHarness::new();
    assert!(execute_json(&mut h, "not json").is_err());
    assert!(execute_json_batch(&mut h, r#"[{"command": "teleport"}]"#).is_err());
}
