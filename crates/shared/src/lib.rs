use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of a committed measurement.
///
/// The id is the identity of the measurement's primitive group: it survives
/// delete/restore cycles, so history replay always refers to the same group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementId(pub Uuid);

impl MeasurementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MeasurementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.simple().to_string()[..8])
    }
}

/// Plain description of a committed two-point measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementData {
    pub id: MeasurementId,
    pub start: [f32; 3],
    pub end: [f32; 3],
    /// Euclidean distance between `start` and `end`
    pub distance: f32,
}

impl MeasurementData {
    pub fn new(id: MeasurementId, start: [f32; 3], end: [f32; 3]) -> Self {
        let d = [end[0] - start[0], end[1] - start[1], end[2] - start[2]];
        let distance = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        Self {
            id,
            start,
            end,
            distance,
        }
    }
}

/// Camera placement: eye position and orbit target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl CameraPose {
    /// Component-wise comparison with an absolute tolerance
    pub fn approx_eq(&self, other: &CameraPose, eps: f32) -> bool {
        self.position
            .iter()
            .chain(self.target.iter())
            .zip(other.position.iter().chain(other.target.iter()))
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

/// Edge-alignment constraint mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    #[default]
    None,
    Parallel,
    Perpendicular,
}

impl AlignmentMode {
    pub fn is_active(&self) -> bool {
        !matches!(self, AlignmentMode::None)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AlignmentMode::None => "None",
            AlignmentMode::Parallel => "Parallel to edge",
            AlignmentMode::Perpendicular => "Perpendicular to edge",
        }
    }

    pub fn all() -> &'static [AlignmentMode] {
        &[
            AlignmentMode::None,
            AlignmentMode::Parallel,
            AlignmentMode::Perpendicular,
        ]
    }
}

/// Kind of characteristic point offered by snapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapKind {
    Vertex,
    EdgeMidpoint,
    Center,
    BboxCorner,
}

/// Discriminant of a history record, used for inspection and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Camera,
    DimensionAdd,
    DimensionDelete,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::Camera => "camera",
            ActionKind::DimensionAdd => "dimension_add",
            ActionKind::DimensionDelete => "dimension_delete",
        })
    }
}
