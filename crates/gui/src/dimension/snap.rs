//! Snapping to characteristic points of the picked object

use glam::Vec3;
use shared::SnapKind;

use crate::viewport::picking::Pickable;

/// Upper bound on mesh vertices examined per query, regardless of density
pub const MAX_VERTEX_SAMPLES: usize = 100;

/// Default snap radius in world units
pub const DEFAULT_SNAP_THRESHOLD: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapCandidate {
    pub position: Vec3,
    pub kind: SnapKind,
}

/// Characteristic points of `object`: a stride-reduced sample of its
/// vertices, its bounding-box corners, center and axis-extent midpoints.
pub fn snap_candidates(object: &Pickable) -> Vec<SnapCandidate> {
    let mesh = &object.mesh;
    let count = mesh.vertex_count();
    let stride = count.div_ceil(MAX_VERTEX_SAMPLES).max(1);

    let mut out: Vec<SnapCandidate> = (0..count)
        .step_by(stride)
        .filter_map(|i| mesh.position(i))
        .map(|position| SnapCandidate {
            position,
            kind: SnapKind::Vertex,
        })
        .collect();

    if let Some(aabb) = object.aabb {
        let center = aabb.center();
        out.push(SnapCandidate {
            position: aabb.min,
            kind: SnapKind::BboxCorner,
        });
        out.push(SnapCandidate {
            position: aabb.max,
            kind: SnapKind::BboxCorner,
        });
        out.push(SnapCandidate {
            position: center,
            kind: SnapKind::Center,
        });
        // Midpoints of the three box edges leaving the min corner
        for position in [
            Vec3::new(center.x, aabb.min.y, aabb.min.z),
            Vec3::new(aabb.min.x, center.y, aabb.min.z),
            Vec3::new(aabb.min.x, aabb.min.y, center.z),
        ] {
            out.push(SnapCandidate {
                position,
                kind: SnapKind::EdgeMidpoint,
            });
        }
    }

    out
}

/// Nearest candidate to `point` within `threshold`, first one wins on ties
pub fn find_nearest_snap(point: Vec3, object: &Pickable, threshold: f32) -> Option<SnapCandidate> {
    let mut best: Option<(f32, SnapCandidate)> = None;

    for candidate in snap_candidates(object) {
        let dist = candidate.position.distance(point);
        if dist <= threshold && best.as_ref().is_none_or(|(d, _)| dist < *d) {
            best = Some((dist, candidate));
        }
    }

    best.map(|(_, c)| c)
}
