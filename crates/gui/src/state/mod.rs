pub mod history;
pub mod settings;

use shared::{CameraPose, MeasurementId};

use crate::dimension::store::MeasurementSnapshot;
use crate::dimension::{
    ClickOutcome, ConfigError, DimensionConfig, DimensionTool, PointerEvent, ToolEvent,
};
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::picking::Pickable;

pub use history::{Action, ActionHistory, ActionRecord, HistoryPhase, HistoryTarget, SettleDebounce};
pub use settings::{HistorySettings, Units, ViewerSettings};

/// Tolerance below which two camera poses count as the same
const POSE_EPSILON: f32 = 1e-4;

/// Shift-click waiting to see whether a second click follows
#[derive(Debug, Clone, Copy)]
struct HeldClick {
    event: PointerEvent,
    at_ms: u64,
}

/// Applies history records to the live camera and tool without
/// producing new records
struct ReplayTarget<'a> {
    camera: &'a mut ArcBallCamera,
    tool: &'a mut DimensionTool,
}

impl HistoryTarget for ReplayTarget<'_> {
    fn set_camera_pose(&mut self, pose: &CameraPose) {
        self.camera.set_pose(pose);
    }

    fn remove_measurement(&mut self, id: &MeasurementId) {
        self.tool.delete_measurement_silent(id);
    }

    fn restore_measurement(&mut self, snapshot: &MeasurementSnapshot) {
        self.tool.restore_measurement(snapshot);
    }
}

/// Viewer session: camera, dimension tool and history wired to host input.
///
/// All timing comes from the `now_ms` values the host passes in.
pub struct ViewerSession {
    pub camera: ArcBallCamera,
    pub tool: DimensionTool,
    /// Objects offered for picking, refreshed when a model finishes loading
    objects: Vec<Pickable>,
    history: ActionHistory,
    camera_debounce: SettleDebounce,
    double_click_ms: u64,
    held_click: Option<HeldClick>,
    /// Measurement selected for deletion
    selected: Option<MeasurementId>,
    now_ms: u64,
}

impl Default for ViewerSession {
    fn default() -> Self {
        let timing = HistorySettings::default();
        Self::assemble(
            DimensionConfig::default(),
            ActionHistory::default(),
            &timing,
        )
    }
}

impl ViewerSession {
    pub fn new(settings: &ViewerSettings) -> Result<Self, ConfigError> {
        let config = DimensionConfig::from_settings(settings)?;
        let history = ActionHistory::with_capacity(settings.history.capacity)?;
        Ok(Self::assemble(config, history, &settings.history))
    }

    fn assemble(config: DimensionConfig, history: ActionHistory, timing: &HistorySettings) -> Self {
        let mut session = Self {
            camera: ArcBallCamera::new(),
            tool: DimensionTool::new(config),
            objects: Vec::new(),
            history,
            camera_debounce: SettleDebounce::new(timing.camera_debounce_ms),
            double_click_ms: timing.double_click_ms,
            held_click: None,
            selected: None,
            now_ms: 0,
        };
        session.record_camera_baseline();
        session
    }

    /// Restart history with the current camera pose as record 0
    pub fn record_camera_baseline(&mut self) {
        self.history.clear();
        self.camera_debounce.cancel();
        self.history.record(Action::Camera(self.camera.pose()), self.now_ms);
    }

    // ── Scene ─────────────────────────────────────────────────

    pub fn set_objects(&mut self, objects: Vec<Pickable>) {
        tracing::info!("Pickable objects refreshed ({})", objects.len());
        self.objects = objects;
        self.tool.cancel();
    }

    pub fn objects(&self) -> &[Pickable] {
        &self.objects
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn selected(&self) -> Option<MeasurementId> {
        self.selected
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    // ── Pointer ───────────────────────────────────────────────

    /// Preview follows the pointer only while Shift is held
    pub fn pointer_moved(&mut self, event: &PointerEvent) {
        if event.modifiers.shift {
            self.tool.handle_pointer_move(event, &self.camera, &self.objects);
        } else {
            self.tool.clear_hover();
        }
    }

    /// Shift-click. A second Shift-click within the double-click window
    /// selects a measurement instead of measuring.
    pub fn pointer_clicked(&mut self, event: &PointerEvent, now_ms: u64) {
        self.now_ms = now_ms;
        if !event.modifiers.shift || !self.tool.is_enabled() {
            return;
        }
        if self.history.is_replaying() {
            tracing::debug!("Click ignored during replay");
            return;
        }

        match self.held_click.take() {
            Some(held) if now_ms.saturating_sub(held.at_ms) <= self.double_click_ms => {
                self.select_at(event);
            }
            Some(held) => {
                self.deliver_click(&held.event);
                self.held_click = Some(HeldClick { event: *event, at_ms: now_ms });
            }
            None => {
                self.held_click = Some(HeldClick { event: *event, at_ms: now_ms });
            }
        }
    }

    fn deliver_click(&mut self, event: &PointerEvent) -> ClickOutcome {
        let outcome = self.tool.handle_click(event, &self.camera, &self.objects);
        self.record_tool_events();
        outcome
    }

    /// Pick and highlight the measurement under `event` for deletion
    pub fn select_at(&mut self, event: &PointerEvent) -> Option<MeasurementId> {
        self.clear_selection();
        let id = self.tool.pick_measurement(event, &self.camera)?;
        self.tool.highlight_measurement(&id, true);
        self.selected = Some(id);
        tracing::info!("Selected dimension {} for deletion", id);
        Some(id)
    }

    pub fn clear_selection(&mut self) {
        if let Some(id) = self.selected.take() {
            self.tool.highlight_measurement(&id, false);
        }
    }

    // ── Keyboard ──────────────────────────────────────────────

    /// Escape: drop the pending point, the held click and the selection
    pub fn cancel(&mut self) {
        self.held_click = None;
        self.tool.cancel();
        self.clear_selection();
    }

    /// Delete the selected measurement, recording the deletion. Refused
    /// while a replay is in progress; the selection is kept.
    pub fn delete_selected(&mut self) -> bool {
        if self.history.is_replaying() {
            tracing::debug!("Delete ignored during replay");
            return false;
        }
        let Some(id) = self.selected.take() else {
            return false;
        };
        let deleted = self.tool.delete_measurement(&id).is_some();
        self.record_tool_events();
        deleted
    }

    pub fn undo(&mut self) -> bool {
        self.flush_camera();
        let mut target = ReplayTarget {
            camera: &mut self.camera,
            tool: &mut self.tool,
        };
        let applied = self.history.undo(&mut target);
        self.forget_stale_selection();
        applied
    }

    pub fn redo(&mut self) -> bool {
        self.flush_camera();
        let mut target = ReplayTarget {
            camera: &mut self.camera,
            tool: &mut self.tool,
        };
        let applied = self.history.redo(&mut target);
        self.forget_stale_selection();
        applied
    }

    fn forget_stale_selection(&mut self) {
        if self.selected.is_some_and(|id| self.tool.measurement(&id).is_none()) {
            self.selected = None;
        }
    }

    /// Remove every measurement. Not undoable: history restarts from the
    /// current camera pose so no record refers to a cleared measurement.
    pub fn clear_all(&mut self) -> usize {
        self.held_click = None;
        self.selected = None;
        let removed = self.tool.clear_all();
        self.record_camera_baseline();
        removed
    }

    // ── Camera ────────────────────────────────────────────────

    /// The user moved the camera. Recorded once the debounce window passes
    /// without further movement.
    pub fn camera_changed(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        if self.history.is_replaying() {
            return;
        }
        self.camera_debounce.poke(now_ms);
    }

    /// The camera has come to rest after a replayed move
    pub fn notify_camera_settled(&mut self) -> bool {
        self.camera_debounce.cancel();
        self.history.confirm_camera_settled()
    }

    /// Record a pending camera move right away
    fn flush_camera(&mut self) {
        if self.camera_debounce.is_pending() {
            self.camera_debounce.cancel();
            self.record_camera();
        }
    }

    fn record_camera(&mut self) {
        let pose = self.camera.pose();
        if self
            .history
            .applied_camera_pose()
            .is_some_and(|applied| applied.approx_eq(&pose, POSE_EPSILON))
        {
            return;
        }
        self.history.record(Action::Camera(pose), self.now_ms);
    }

    fn record_tool_events(&mut self) {
        for event in self.tool.take_events() {
            let action = match event {
                ToolEvent::Created(snapshot) => Action::DimensionAdd(snapshot),
                ToolEvent::Deleted(snapshot) => Action::DimensionDelete(snapshot),
            };
            self.history.record(action, self.now_ms);
        }
    }

    // ── Frame ─────────────────────────────────────────────────

    /// Advance the session clock: deliver an expired held click and
    /// record a settled camera. Returns the outcome of a delivered click.
    pub fn tick(&mut self, now_ms: u64) -> Option<ClickOutcome> {
        self.now_ms = now_ms;

        let mut outcome = None;
        if let Some(held) = self.held_click {
            if now_ms.saturating_sub(held.at_ms) > self.double_click_ms {
                self.held_click = None;
                if !self.history.is_replaying() {
                    outcome = Some(self.deliver_click(&held.event));
                }
            }
        }

        if self.camera_debounce.poll(now_ms) {
            self.record_camera();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use glam::Vec3;

    fn viewport() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    fn session() -> ViewerSession {
        let mut s = ViewerSession::default();
        s.set_objects(fixtures::single_box());
        s.tool.enable();
        s
    }

    fn shift_at(s: &ViewerSession, p: Vec3) -> PointerEvent {
        PointerEvent::new(s.camera.project(p, viewport()).unwrap(), viewport()).with_shift()
    }

    #[test]
    fn test_baseline_camera_record() {
        let s = ViewerSession::default();
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history().cursor(), Some(0));
        assert!(!s.history().can_undo());
    }

    #[test]
    fn test_click_is_held_for_double_click_window() {
        let mut s = session();
        let e = shift_at(&s, Vec3::new(-0.5, 1.0, 0.0));
        s.pointer_clicked(&e, 1000);
        assert!(s.tool.pending_point().is_none());
        assert_eq!(s.tick(1200), None);
        assert_eq!(s.tick(1301), Some(ClickOutcome::FirstPoint));
        assert!(s.tool.pending_point().is_some());
    }

    #[test]
    fn test_click_without_shift_ignored() {
        let mut s = session();
        let e = PointerEvent::new(s.camera.project(Vec3::Y, viewport()).unwrap(), viewport());
        s.pointer_clicked(&e, 0);
        assert_eq!(s.tick(1000), None);
    }

    #[test]
    fn test_camera_debounce_records_once() {
        let mut s = session();
        s.camera.rotate(10.0, 0.0);
        s.camera_changed(100);
        s.camera.rotate(10.0, 0.0);
        s.camera_changed(250);
        s.tick(400);
        assert_eq!(s.history().len(), 1);
        s.tick(550);
        assert_eq!(s.history().len(), 2);

        // Settling again at the same pose adds nothing
        s.camera_changed(600);
        s.tick(1000);
        assert_eq!(s.history().len(), 2);
    }
}
