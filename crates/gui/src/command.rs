//! JSON command protocol for scripting the viewer session.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shared::AlignmentMode;

use crate::dimension::ClickOutcome;
use crate::harness::TestHarness;

/// A command that can be executed against the harness.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ViewerCommand {
    /// Enable the dimension tool.
    Enable,
    /// Disable the dimension tool, dropping transient state.
    Disable,
    /// Shift-move the pointer over a world point.
    Move { point: [f32; 3] },
    /// Shift-click over a world point.
    Click { point: [f32; 3] },
    /// Double Shift-click over a world point to select a measurement.
    Select { point: [f32; 3] },
    /// Delete the selected measurement.
    DeleteSelected,
    /// Cancel the pending point and the selection.
    Cancel,
    /// Orbit the camera by degrees and let it settle.
    Orbit { dx: f32, dy: f32 },
    /// Undo the last action.
    Undo,
    /// Redo the last undone action.
    Redo,
    /// Toggle snapping, optionally with a new radius.
    SetSnap {
        enabled: bool,
        #[serde(default)]
        threshold: Option<f32>,
    },
    /// Toggle the orthogonal lock.
    SetOrthogonal { enabled: bool },
    /// Set the edge-alignment mode.
    SetAlignment { mode: AlignmentMode },
    /// Inspect measurements, tool state and history.
    Inspect,
    /// Remove every measurement.
    Clear,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn outcome_json(outcome: ClickOutcome) -> serde_json::Value {
    match outcome {
        ClickOutcome::Ignored => serde_json::json!({ "outcome": "ignored" }),
        ClickOutcome::ReferenceEdgeSet => serde_json::json!({ "outcome": "reference_edge" }),
        ClickOutcome::FirstPoint => serde_json::json!({ "outcome": "first_point" }),
        ClickOutcome::Committed(id) => {
            serde_json::json!({ "outcome": "committed", "id": id })
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: ViewerCommand) -> CommandResponse {
    match cmd {
        ViewerCommand::Enable => {
            harness.enable();
            CommandResponse::ok()
        }

        ViewerCommand::Disable => {
            harness.disable();
            CommandResponse::ok()
        }

        ViewerCommand::Move { point } => {
            harness.move_to(Vec3::from_array(point));
            CommandResponse::ok()
        }

        ViewerCommand::Click { point } => {
            let outcome = harness.click_at(Vec3::from_array(point));
            CommandResponse::ok_with_data(outcome_json(outcome))
        }

        ViewerCommand::Select { point } => {
            let selected = harness.select_at(Vec3::from_array(point));
            CommandResponse::ok_with_data(serde_json::json!({ "selected": selected }))
        }

        ViewerCommand::DeleteSelected => {
            let deleted = harness.delete_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "deleted": deleted }))
        }

        ViewerCommand::Cancel => {
            harness.cancel();
            CommandResponse::ok()
        }

        ViewerCommand::Orbit { dx, dy } => {
            harness.orbit(dx, dy);
            CommandResponse::ok_with_data(serde_json::json!({ "camera": harness.camera_pose() }))
        }

        ViewerCommand::Undo => {
            let success = harness.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        ViewerCommand::Redo => {
            let success = harness.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        ViewerCommand::SetSnap { enabled, threshold } => {
            if let Some(t) = threshold {
                if let Err(e) = harness.session.tool.set_snap_threshold(t) {
                    tracing::warn!("set_snap rejected: {e}");
                    return CommandResponse::err(e.to_string());
                }
            }
            harness.set_snap(enabled);
            CommandResponse::ok()
        }

        ViewerCommand::SetOrthogonal { enabled } => {
            harness.set_orthogonal(enabled);
            CommandResponse::ok()
        }

        ViewerCommand::SetAlignment { mode } => {
            harness.set_alignment(mode);
            CommandResponse::ok()
        }

        ViewerCommand::Inspect => {
            let history = harness.session.history();
            let kinds: Vec<_> = history.records().iter().map(|r| r.action.kind()).collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "tool_state": format!("{:?}", harness.tool_state()),
                "measurement_count": harness.measurement_count(),
                "measurements": harness.measurements(),
                "selected": harness.session.selected(),
                "history": {
                    "length": history.len(),
                    "cursor": history.cursor(),
                    "kinds": kinds,
                },
                "camera": harness.camera_pose(),
            }))
        }

        ViewerCommand::Clear => {
            let removed = harness.clear();
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: ViewerCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<ViewerCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_undo() {
        let cmd: ViewerCommand = serde_json::from_str(r#"{"command": "undo"}"#).unwrap();
        assert!(matches!(cmd, ViewerCommand::Undo));
    }

    #[test]
    fn test_command_serde_click() {
        let json = r#"{"command": "click", "point": [0.5, 1.0, 0.0]}"#;
        match serde_json::from_str(json).unwrap() {
            ViewerCommand::Click { point } => assert_eq!(point, [0.5, 1.0, 0.0]),
            other => panic!("Expected Click, got {other:?}"),
        }
    }

    #[test]
    fn test_command_serde_set_alignment() {
        let json = r#"{"command": "set_alignment", "mode": "perpendicular"}"#;
        match serde_json::from_str(json).unwrap() {
            ViewerCommand::SetAlignment { mode } => assert_eq!(mode, AlignmentMode::Perpendicular),
            other => panic!("Expected SetAlignment, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_error() {
        let mut h = TestHarness::new();
        let err = execute_json(&mut h, r#"{"command": "fly"}"#).unwrap_err();
        assert!(err.starts_with("Invalid command JSON"));
    }

    #[test]
    fn test_set_snap_rejects_bad_threshold() {
        let mut h = TestHarness::new();
        let json = r#"{"command": "set_snap", "enabled": true, "threshold": -2.0}"#;
        let resp = execute_json(&mut h, json).unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("snap threshold"));
    }

    #[test]
    fn test_execute_inspect_empty() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["measurement_count"], 0);
        assert_eq!(data["history"]["length"], 1);
        assert_eq!(data["history"]["cursor"], 0);
        assert_eq!(data["tool_state"], "Disabled");
    }
}
