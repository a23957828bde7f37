//! Undo/redo log of camera moves and measurement edits
//!
//! The log is a flat list with a cursor at the last applied record. Undo and
//! redo move the cursor and apply one record backwards or forwards through a
//! [`HistoryTarget`]. While a record is being applied the log is in
//! [`HistoryPhase::Replaying`] and refuses new records; a replay that moved
//! the camera only ends when the host confirms the camera has settled.

use shared::{ActionKind, CameraPose, MeasurementId};

use crate::dimension::store::MeasurementSnapshot;
use crate::dimension::ConfigError;

/// Default maximum number of records kept
pub const DEFAULT_CAPACITY: usize = 50;

/// One reversible action
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Camera came to rest at this pose
    Camera(CameraPose),
    DimensionAdd(MeasurementSnapshot),
    DimensionDelete(MeasurementSnapshot),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Camera(_) => ActionKind::Camera,
            Action::DimensionAdd(_) => ActionKind::DimensionAdd,
            Action::DimensionDelete(_) => ActionKind::DimensionDelete,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    pub action: Action,
    /// Milliseconds on the session clock
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPhase {
    #[default]
    Recording,
    /// A record is being applied; `awaiting_camera` stays set until the
    /// host reports the camera has settled
    Replaying { awaiting_camera: bool },
}

/// Side effects of replaying a record. Implementations must not report
/// these changes back as new actions.
pub trait HistoryTarget {
    fn set_camera_pose(&mut self, pose: &CameraPose);
    fn remove_measurement(&mut self, id: &MeasurementId);
    fn restore_measurement(&mut self, snapshot: &MeasurementSnapshot);
}

#[derive(Debug)]
pub struct ActionHistory {
    records: Vec<ActionRecord>,
    /// Index of the last applied record, None when nothing is applied
    cursor: Option<usize>,
    capacity: usize,
    phase: HistoryPhase,
}

impl Default for ActionHistory {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            cursor: None,
            capacity: DEFAULT_CAPACITY,
            phase: HistoryPhase::Recording,
        }
    }
}

impl ActionHistory {
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        Ok(Self {
            capacity,
            ..Self::default()
        })
    }

    /// Append `action` after the cursor, dropping any redoable tail.
    /// Refused while replaying.
    pub fn record(&mut self, action: Action, timestamp_ms: u64) -> bool {
        if self.is_replaying() {
            tracing::debug!("History write of {} suppressed during replay", action.kind());
            return false;
        }

        match self.cursor {
            Some(c) => self.records.truncate(c + 1),
            None => self.records.clear(),
        }
        tracing::debug!("Recording {}", action.kind());
        self.records.push(ActionRecord {
            action,
            timestamp_ms,
        });
        if self.records.len() > self.capacity {
            let excess = self.records.len() - self.capacity;
            self.records.drain(..excess);
        }
        self.cursor = self.records.len().checked_sub(1);
        true
    }

    /// Step back one record, applying its inverse
    pub fn undo(&mut self, target: &mut impl HistoryTarget) -> bool {
        if self.is_replaying() {
            tracing::debug!("Undo ignored during replay");
            return false;
        }
        let Some(current) = self.cursor.filter(|c| *c > 0) else {
            tracing::debug!("Nothing to undo");
            return false;
        };

        let new_cursor = current - 1;
        self.cursor = Some(new_cursor);
        self.phase = HistoryPhase::Replaying {
            awaiting_camera: false,
        };

        let moved_camera = self.apply_inverse(current, new_cursor, target);
        self.finish_apply(moved_camera);
        tracing::info!(
            "Undo {} ({}/{})",
            self.records[current].action.kind(),
            current,
            self.records.len()
        );
        true
    }

    /// Step forward one record, applying it again
    pub fn redo(&mut self, target: &mut impl HistoryTarget) -> bool {
        if self.is_replaying() {
            tracing::debug!("Redo ignored during replay");
            return false;
        }
        let next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.records.len() {
            tracing::debug!("Nothing to redo");
            return false;
        }

        self.cursor = Some(next);
        self.phase = HistoryPhase::Replaying {
            awaiting_camera: false,
        };

        let moved_camera = self.apply_forward(next, target);
        self.finish_apply(moved_camera);
        tracing::info!(
            "Redo {} ({}/{})",
            self.records[next].action.kind(),
            next + 1,
            self.records.len()
        );
        true
    }

    /// Undo `records[undone]`. Returns true if the camera was moved.
    fn apply_inverse(
        &self,
        undone: usize,
        new_cursor: usize,
        target: &mut impl HistoryTarget,
    ) -> bool {
        match &self.records[undone].action {
            Action::Camera(_) => match self.camera_pose_at_or_before(new_cursor) {
                Some(pose) => {
                    target.set_camera_pose(&pose);
                    true
                }
                None => false,
            },
            Action::DimensionAdd(snapshot) => {
                target.remove_measurement(&snapshot.id);
                false
            }
            Action::DimensionDelete(snapshot) => {
                target.restore_measurement(snapshot);
                false
            }
        }
    }

    /// Re-apply `records[index]`. Returns true if the camera was moved.
    fn apply_forward(&self, index: usize, target: &mut impl HistoryTarget) -> bool {
        match &self.records[index].action {
            Action::Camera(pose) => {
                target.set_camera_pose(pose);
                true
            }
            Action::DimensionAdd(snapshot) => {
                target.restore_measurement(snapshot);
                false
            }
            Action::DimensionDelete(snapshot) => {
                target.remove_measurement(&snapshot.id);
                false
            }
        }
    }

    fn finish_apply(&mut self, moved_camera: bool) {
        self.phase = if moved_camera {
            HistoryPhase::Replaying {
                awaiting_camera: true,
            }
        } else {
            HistoryPhase::Recording
        };
    }

    /// End a replay that is waiting on the camera. Returns true if one was.
    pub fn confirm_camera_settled(&mut self) -> bool {
        if self.phase == (HistoryPhase::Replaying { awaiting_camera: true }) {
            self.phase = HistoryPhase::Recording;
            tracing::debug!("Replay finished");
            true
        } else {
            false
        }
    }

    /// Pose of the most recent camera record at or before `index`
    fn camera_pose_at_or_before(&self, index: usize) -> Option<CameraPose> {
        self.records
            .get(..=index)?
            .iter()
            .rev()
            .find_map(|r| match &r.action {
                Action::Camera(pose) => Some(*pose),
                _ => None,
            })
    }

    /// Camera pose the applied part of the log ends at
    pub fn applied_camera_pose(&self) -> Option<CameraPose> {
        self.camera_pose_at_or_before(self.cursor?)
    }

    pub fn phase(&self) -> HistoryPhase {
        self.phase
    }

    pub fn is_replaying(&self) -> bool {
        matches!(self.phase, HistoryPhase::Replaying { .. })
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.records.len()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.cursor = None;
        self.phase = HistoryPhase::Recording;
    }
}

/// Coalesces bursts of notifications into one event after a quiet period
#[derive(Debug, Clone)]
pub struct SettleDebounce {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl SettleDebounce {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Restart the quiet period at `now`
    pub fn poke(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    /// True once, when the quiet period has elapsed
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::scene::DetachedGroup;
    use glam::Vec3;

    #[derive(Default)]
    struct Mock {
        camera: Option<CameraPose>,
        live: Vec<MeasurementId>,
    }

    impl HistoryTarget for Mock {
        fn set_camera_pose(&mut self, pose: &CameraPose) {
            self.camera = Some(*pose);
        }

        fn remove_measurement(&mut self, id: &MeasurementId) {
            self.live.retain(|m| m != id);
        }

        fn restore_measurement(&mut self, snapshot: &MeasurementSnapshot) {
            if !self.live.contains(&snapshot.id) {
                self.live.push(snapshot.id);
            }
        }
    }

    fn pose(x: f32) -> CameraPose {
        CameraPose {
            position: [x, 5.0, 10.0],
            target: [0.0; 3],
        }
    }

    fn snapshot() -> MeasurementSnapshot {
        MeasurementSnapshot {
            id: MeasurementId::new(),
            start: Vec3::ZERO,
            end: Vec3::X,
            primitives: DetachedGroup::default(),
        }
    }

    fn settle(h: &mut ActionHistory) {
        h.confirm_camera_settled();
    }

    #[test]
    fn test_record_undo_redo_roundtrip() {
        let mut h = ActionHistory::default();
        let mut target = Mock::default();
        h.record(Action::Camera(pose(0.0)), 0);

        let s = snapshot();
        target.live.push(s.id);
        h.record(Action::DimensionAdd(s.clone()), 10);
        target.camera = Some(pose(3.0));
        h.record(Action::Camera(pose(3.0)), 20);

        let before = (target.live.clone(), target.camera);

        assert!(h.undo(&mut target));
        assert_eq!(target.camera, Some(pose(0.0)));
        settle(&mut h);
        assert!(h.undo(&mut target));
        assert!(target.live.is_empty());

        assert!(h.redo(&mut target));
        assert!(h.redo(&mut target));
        assert!(h.is_replaying());
        settle(&mut h);
        assert_eq!((target.live.clone(), target.camera), before);
    }

    #[test]
    fn test_branch_truncation() {
        let mut h = ActionHistory::default();
        let mut target = Mock::default();
        for i in 0..5 {
            h.record(Action::DimensionAdd(snapshot()), i);
        }
        h.undo(&mut target);
        h.undo(&mut target);
        let cursor_before = h.cursor().unwrap();
        assert_eq!(cursor_before, 2);
        assert!(h.can_redo());

        h.record(Action::Camera(pose(1.0)), 99);
        assert_eq!(h.len(), cursor_before + 2);
        assert_eq!(h.cursor(), Some(cursor_before + 1));
        assert!(!h.can_redo());
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut h = ActionHistory::default();
        let mut target = Mock::default();
        assert!(!h.undo(&mut target));
        assert!(!h.redo(&mut target));

        h.record(Action::Camera(pose(0.0)), 0);
        assert!(!h.undo(&mut target));
        assert_eq!(h.cursor(), Some(0));
        assert!(target.camera.is_none());

        h.record(Action::DimensionAdd(snapshot()), 1);
        assert!(!h.redo(&mut target));
        assert_eq!(h.cursor(), Some(1));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut h = ActionHistory::with_capacity(3).unwrap();
        for i in 0..5 {
            h.record(Action::Camera(pose(i as f32)), i);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.cursor(), Some(2));
        assert_eq!(h.records()[0].action, Action::Camera(pose(2.0)));
        assert_eq!(ActionHistory::with_capacity(0).unwrap_err(), ConfigError::ZeroHistoryCapacity);
    }

    #[test]
    fn test_replay_blocks_records_until_camera_settles() {
        let mut h = ActionHistory::default();
        let mut target = Mock::default();
        h.record(Action::Camera(pose(0.0)), 0);
        h.record(Action::Camera(pose(1.0)), 1);

        assert!(h.undo(&mut target));
        assert_eq!(h.phase(), HistoryPhase::Replaying { awaiting_camera: true });
        assert!(!h.record(Action::Camera(pose(0.0)), 2));
        assert!(!h.redo(&mut target));
        assert_eq!(h.len(), 2);

        assert!(h.confirm_camera_settled());
        assert!(!h.confirm_camera_settled());
        assert_eq!(h.phase(), HistoryPhase::Recording);
        assert!(h.redo(&mut target));
        assert_eq!(target.camera, Some(pose(1.0)));
    }

    #[test]
    fn test_dimension_replay_completes_immediately() {
        let mut h = ActionHistory::default();
        let mut target = Mock::default();
        h.record(Action::Camera(pose(0.0)), 0);
        let s = snapshot();
        h.record(Action::DimensionDelete(s.clone()), 1);

        assert!(h.undo(&mut target));
        assert_eq!(target.live, vec![s.id]);
        assert_eq!(h.phase(), HistoryPhase::Recording);
        assert!(target.camera.is_none());

        assert!(h.redo(&mut target));
        assert!(target.live.is_empty());
    }

    #[test]
    fn test_camera_undo_uses_latest_camera_record() {
        let mut h = ActionHistory::default();
        let mut target = Mock::default();
        h.record(Action::Camera(pose(0.0)), 0);
        h.record(Action::DimensionAdd(snapshot()), 1);
        h.record(Action::Camera(pose(2.0)), 2);

        assert!(h.undo(&mut target));
        // Record at the new cursor is a dimension; the pose comes from record 0
        assert_eq!(target.camera, Some(pose(0.0)));
        assert_eq!(h.applied_camera_pose(), Some(pose(0.0)));
    }

    #[test]
    fn test_debounce() {
        let mut d = SettleDebounce::new(300);
        assert!(!d.poll(0));
        d.poke(0);
        d.poke(200);
        assert!(!d.poll(400));
        assert!(d.is_pending());
        assert!(d.poll(500));
        assert!(!d.poll(600));
    }
}
