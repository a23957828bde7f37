//! Headless test harness driving a viewer session.
//!
//! Uses a fixed 800x600 viewport and a virtual millisecond clock, so pointer
//! input can be given as world points and all timing is deterministic.

use glam::Vec3;
use shared::{AlignmentMode, CameraPose, MeasurementData, MeasurementId};

use crate::dimension::{ClickOutcome, PointerEvent, ToolState};
use crate::fixtures;
use crate::state::ViewerSession;
use crate::viewport::picking::Pickable;

/// Clock step used to let a held click or a camera move settle
pub const SETTLE_MS: u64 = 1_000;

/// Delay between the two clicks of a double click
const DOUBLE_CLICK_GAP_MS: u64 = 50;

/// Headless test harness: session, viewport and virtual clock
pub struct TestHarness {
    pub session: ViewerSession,
    viewport: egui::Rect,
    now_ms: u64,
}

impl TestHarness {
    /// Harness over the single-box fixture, tool disabled.
    pub fn new() -> Self {
        Self::with_objects(fixtures::single_box())
    }

    pub fn with_objects(objects: Vec<Pickable>) -> Self {
        let mut session = ViewerSession::default();
        session.set_objects(objects);
        Self {
            session,
            viewport: egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0)),
            now_ms: 0,
        }
    }

    // ── Clock ─────────────────────────────────────────────────

    /// Advance the virtual clock and tick the session
    pub fn advance(&mut self, ms: u64) -> Option<ClickOutcome> {
        self.now_ms += ms;
        self.session.tick(self.now_ms)
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    // ── Tool ──────────────────────────────────────────────────

    pub fn enable(&mut self) {
        self.session.tool.enable();
    }

    pub fn disable(&mut self) {
        self.session.tool.disable();
    }

    pub fn tool_state(&self) -> ToolState {
        self.session.tool.state()
    }

    pub fn set_snap(&mut self, enabled: bool) {
        self.session.tool.set_snap_enabled(enabled);
    }

    pub fn set_orthogonal(&mut self, enabled: bool) {
        self.session.tool.set_orthogonal(enabled);
    }

    pub fn set_alignment(&mut self, mode: AlignmentMode) {
        self.session.tool.set_alignment(mode);
    }

    // ── Pointer ───────────────────────────────────────────────

    /// Screen position of a world point, None if it is behind the camera
    pub fn screen_of(&self, point: Vec3) -> Option<egui::Pos2> {
        self.session.camera.project(point, self.viewport)
    }

    fn shift_event(&self, screen: egui::Pos2) -> PointerEvent {
        PointerEvent::new(screen, self.viewport).with_shift()
    }

    /// Shift-move over a world point
    pub fn move_to(&mut self, point: Vec3) {
        if let Some(screen) = self.screen_of(point) {
            let event = self.shift_event(screen);
            self.session.pointer_moved(&event);
        }
    }

    /// Shift-click a screen position and let the click window pass
    pub fn click_screen(&mut self, x: f32, y: f32) -> ClickOutcome {
        let event = self.shift_event(egui::pos2(x, y));
        self.session.pointer_clicked(&event, self.now_ms);
        self.advance(SETTLE_MS).unwrap_or(ClickOutcome::Ignored)
    }

    /// Shift-click over a world point and let the click window pass
    pub fn click_at(&mut self, point: Vec3) -> ClickOutcome {
        match self.screen_of(point) {
            Some(screen) => self.click_screen(screen.x, screen.y),
            None => ClickOutcome::Ignored,
        }
    }

    /// Two clicks; returns the committed measurement
    pub fn measure(&mut self, start: Vec3, end: Vec3) -> Option<MeasurementId> {
        self.click_at(start);
        match self.click_at(end) {
            ClickOutcome::Committed(id) => Some(id),
            _ => None,
        }
    }

    /// Double Shift-click a screen position to select for deletion
    pub fn select_screen(&mut self, x: f32, y: f32) -> Option<MeasurementId> {
        let event = self.shift_event(egui::pos2(x, y));
        self.session.pointer_clicked(&event, self.now_ms);
        self.now_ms += DOUBLE_CLICK_GAP_MS;
        self.session.pointer_clicked(&event, self.now_ms);
        self.advance(SETTLE_MS);
        self.session.selected()
    }

    /// Double Shift-click over a world point to select for deletion
    pub fn select_at(&mut self, point: Vec3) -> Option<MeasurementId> {
        let screen = self.screen_of(point)?;
        self.select_screen(screen.x, screen.y)
    }

    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected()
    }

    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    // ── Camera and history ────────────────────────────────────

    /// Orbit the camera and let the move settle into history
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.session.camera.rotate(dx, dy);
        self.session.camera_changed(self.now_ms);
        self.advance(SETTLE_MS);
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.session.camera.pose()
    }

    /// Undo one record; the harness camera settles instantly
    pub fn undo(&mut self) -> bool {
        let applied = self.session.undo();
        self.session.notify_camera_settled();
        applied
    }

    /// Redo one record; the harness camera settles instantly
    pub fn redo(&mut self) -> bool {
        let applied = self.session.redo();
        self.session.notify_camera_settled();
        applied
    }

    pub fn history_len(&self) -> usize {
        self.session.history().len()
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.session.history().cursor()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn measurement_count(&self) -> usize {
        self.session.tool.measurement_count()
    }

    pub fn measurements(&self) -> Vec<MeasurementData> {
        self.session.tool.measurements()
    }

    pub fn measurement(&self, id: &MeasurementId) -> Option<MeasurementData> {
        self.session.tool.measurement(id).map(|m| m.data())
    }

    pub fn clear(&mut self) -> usize {
        self.session.clear_all()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
