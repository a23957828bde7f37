//! Primitive generation for measurements, previews and indicators

use glam::Vec3;

use super::constraint::ReferenceEdge;
use super::scene::{Primitive, PrimitiveRole, Rgba};
use super::snap::SnapCandidate;
use crate::state::settings::Units;

pub const LINE_COLOR: Rgba = [0, 102, 255, 255];
pub const MARKER_COLOR: Rgba = [255, 0, 0, 255];
pub const LABEL_COLOR: Rgba = [20, 20, 20, 255];
pub const PREVIEW_COLOR: Rgba = [255, 200, 50, 200];
pub const SNAP_COLOR: Rgba = [0, 220, 120, 255];
pub const REFERENCE_EDGE_COLOR: Rgba = [255, 0, 255, 255];
pub const HIGHLIGHT_COLOR: Rgba = [255, 140, 0, 255];

pub const MARKER_RADIUS: f32 = 0.05;
pub const SNAP_INDICATOR_RADIUS: f32 = 0.08;
pub const TICK_LENGTH: f32 = 0.15;

/// Label world scale per unit of camera distance (constant apparent size)
pub const LABEL_SCALE_PER_DISTANCE: f32 = 0.05;

pub fn format_distance(distance: f32, precision: usize, units: Units) -> String {
    format!("{:.*} {}", precision, distance, units.abbrev())
}

/// Unit vector perpendicular to `dir`, used for tick orientation
fn tick_axis(dir: Vec3) -> Vec3 {
    let helper = if dir.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
    dir.cross(helper).try_normalize().unwrap_or(Vec3::Z)
}

fn ticks(start: Vec3, end: Vec3, color: Rgba, role: PrimitiveRole) -> Vec<Primitive> {
    let Some(dir) = (end - start).try_normalize() else {
        return Vec::new();
    };
    let half = tick_axis(dir) * (TICK_LENGTH * 0.5);
    vec![
        Primitive::line(start - half, start + half, color, role),
        Primitive::line(end - half, end + half, color, role),
    ]
}

/// Line, two end markers, directional ticks and a billboard label
pub fn measurement_primitives(start: Vec3, end: Vec3, text: String) -> Vec<Primitive> {
    let mut out = vec![Primitive::line(start, end, LINE_COLOR, PrimitiveRole::DimensionLine)];
    out.push(Primitive::marker(start, MARKER_RADIUS, MARKER_COLOR, PrimitiveRole::EndMarker));
    out.push(Primitive::marker(end, MARKER_RADIUS, MARKER_COLOR, PrimitiveRole::EndMarker));
    out.extend(ticks(start, end, LINE_COLOR, PrimitiveRole::Tick));
    out.push(Primitive::label((start + end) * 0.5, text, LABEL_COLOR, PrimitiveRole::Label));
    out
}

/// Live preview between the anchor and the current candidate
pub fn preview_primitives(anchor: Vec3, candidate: Vec3, text: String) -> Vec<Primitive> {
    let mut out = vec![Primitive::line(anchor, candidate, PREVIEW_COLOR, PrimitiveRole::Preview)];
    out.extend(ticks(anchor, candidate, PREVIEW_COLOR, PrimitiveRole::Preview));
    let mid = (anchor + candidate) * 0.5;
    out.push(Primitive::label(mid, text, PREVIEW_COLOR, PrimitiveRole::Preview));
    out
}

pub fn pending_marker(point: Vec3) -> Primitive {
    Primitive::marker(point, MARKER_RADIUS, MARKER_COLOR, PrimitiveRole::PendingMarker)
}

pub fn snap_indicator(candidate: &SnapCandidate) -> Primitive {
    Primitive::marker(
        candidate.position,
        SNAP_INDICATOR_RADIUS,
        SNAP_COLOR,
        PrimitiveRole::SnapIndicator,
    )
}

pub fn reference_edge_primitive(edge: &ReferenceEdge) -> Primitive {
    Primitive::line(edge.start, edge.end, REFERENCE_EDGE_COLOR, PrimitiveRole::ReferenceEdge)
}

/// Scale keeping a label's apparent size constant from `eye`
pub fn label_scale(eye: Vec3, position: Vec3) -> f32 {
    eye.distance(position) * LABEL_SCALE_PER_DISTANCE
}

/// Pulse factor for the snap indicator at `elapsed` seconds
pub fn snap_pulse(elapsed: f32) -> f32 {
    1.0 + 0.25 * (elapsed * std::f32::consts::TAU * 1.5).sin()
}
