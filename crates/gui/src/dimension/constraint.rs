//! Geometric constraints applied to the second point of a measurement

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shared::AlignmentMode;

use crate::viewport::edge::{extract_sharp_edges, nearest_edge};
use crate::viewport::picking::{point_segment_distance, PickHit, Pickable};

/// Half length of the visual reference segment drawn at the click point
pub const REFERENCE_EDGE_HALF_LENGTH: f32 = 1.0;

/// Maximum distance from the click to a mesh edge for it to be chosen
pub const EDGE_SEARCH_RADIUS: f32 = 0.25;

/// Dihedral angle above which a mesh edge counts as a feature edge
const SHARP_EDGE_DEGREES: f32 = 20.0;

/// Direction used when nothing better can be derived
const FALLBACK_DIRECTION: Vec3 = Vec3::X;

/// How a reference edge is inferred from a click on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStrategy {
    /// Nearest feature edge of the mesh, falling back to the nearest bounding-box edge
    #[default]
    NearestMeshEdge,
    /// World axis least aligned with the surface normal, projected into the surface
    SurfaceNormal,
}

/// A user-picked direction that aligned measurements follow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceEdge {
    pub start: Vec3,
    pub end: Vec3,
    /// Unit length
    pub direction: Vec3,
    pub mode: AlignmentMode,
}

impl ReferenceEdge {
    /// Edge along `direction` centered on `center`. A degenerate direction
    /// falls back to the X axis.
    pub fn centered(center: Vec3, direction: Vec3, mode: AlignmentMode) -> Self {
        let direction = direction.try_normalize().unwrap_or(FALLBACK_DIRECTION);
        Self {
            start: center - direction * REFERENCE_EDGE_HALF_LENGTH,
            end: center + direction * REFERENCE_EDGE_HALF_LENGTH,
            direction,
            mode,
        }
    }

    /// Constrain `raw` relative to `anchor` according to the edge mode
    pub fn constrain(&self, anchor: Vec3, raw: Vec3) -> Vec3 {
        match self.mode {
            AlignmentMode::Parallel => align_parallel(anchor, raw, self.direction),
            AlignmentMode::Perpendicular => align_perpendicular(anchor, raw, self.direction),
            AlignmentMode::None => raw,
        }
    }
}

/// Keep only the dominant axis of `raw - anchor`.
///
/// The result equals `anchor` except on the axis with the largest absolute
/// displacement, which takes `raw`'s coordinate. Ties prefer X, then Y.
pub fn orthogonal_lock(anchor: Vec3, raw: Vec3) -> Vec3 {
    let delta = (raw - anchor).abs();
    let mut out = anchor;
    if delta.x >= delta.y && delta.x >= delta.z {
        out.x = raw.x;
    } else if delta.y >= delta.z {
        out.y = raw.y;
    } else {
        out.z = raw.z;
    }
    out
}

/// Project `raw - anchor` onto the line through `anchor` along `direction`
pub fn align_parallel(anchor: Vec3, raw: Vec3, direction: Vec3) -> Vec3 {
    let d = direction.try_normalize().unwrap_or(FALLBACK_DIRECTION);
    anchor + d * (raw - anchor).dot(d)
}

/// Keep the dominant component of `raw - anchor` among two axes
/// perpendicular to `direction`
pub fn align_perpendicular(anchor: Vec3, raw: Vec3, direction: Vec3) -> Vec3 {
    let d = direction.try_normalize().unwrap_or(FALLBACK_DIRECTION);
    let (p1, p2) = perpendicular_basis(d);
    let delta = raw - anchor;
    let a = delta.dot(p1);
    let b = delta.dot(p2);
    if a.abs() >= b.abs() {
        anchor + p1 * a
    } else {
        anchor + p2 * b
    }
}

/// Two unit vectors orthogonal to `d` and to each other
fn perpendicular_basis(d: Vec3) -> (Vec3, Vec3) {
    // Helper axis must not be parallel to d
    let helper = if d.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let p1 = d.cross(helper).normalize();
    let p2 = d.cross(p1).normalize();
    (p1, p2)
}

/// World axis least aligned with `normal`, projected into the surface plane.
/// A missing or degenerate normal yields the fallback axis.
pub fn in_surface_direction(normal: Option<Vec3>) -> Vec3 {
    let Some(n) = normal.and_then(|n| n.try_normalize()) else {
        return FALLBACK_DIRECTION;
    };

    let axis = [Vec3::X, Vec3::Y, Vec3::Z]
        .into_iter()
        .min_by(|a, b| a.dot(n).abs().total_cmp(&b.dot(n).abs()))
        .unwrap_or(FALLBACK_DIRECTION);

    (axis - n * axis.dot(n)).try_normalize().unwrap_or(axis)
}

/// Derive a reference edge from a surface click.
///
/// With [`EdgeStrategy::NearestMeshEdge`] the nearest feature edge of the hit
/// mesh is used; without one within [`EDGE_SEARCH_RADIUS`] the nearest
/// bounding-box edge is used instead.
pub fn derive_reference_edge(
    hit: &PickHit,
    object: &Pickable,
    mode: AlignmentMode,
    strategy: EdgeStrategy,
) -> ReferenceEdge {
    match strategy {
        EdgeStrategy::SurfaceNormal => {
            ReferenceEdge::centered(hit.point, in_surface_direction(hit.normal), mode)
        }
        EdgeStrategy::NearestMeshEdge => {
            let edges = extract_sharp_edges(&object.mesh, SHARP_EDGE_DEGREES);
            let segment = nearest_edge(hit.point, &edges, EDGE_SEARCH_RADIUS)
                .map(|e| (e.start, e.end))
                .or_else(|| nearest_box_edge(hit.point, object));

            match segment {
                Some((start, end)) => match (end - start).try_normalize() {
                    Some(direction) => ReferenceEdge {
                        start,
                        end,
                        direction,
                        mode,
                    },
                    None => ReferenceEdge::centered(hit.point, FALLBACK_DIRECTION, mode),
                },
                None => ReferenceEdge::centered(hit.point, in_surface_direction(hit.normal), mode),
            }
        }
    }
}

fn nearest_box_edge(point: Vec3, object: &Pickable) -> Option<(Vec3, Vec3)> {
    let aabb = object.aabb?;
    aabb.edges()
        .into_iter()
        .filter(|(a, b)| a.distance(*b) > 1e-6)
        .min_by(|x, y| {
            point_segment_distance(point, x.0, x.1)
                .total_cmp(&point_segment_distance(point, y.0, y.1))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh::{cube, MeshData};

    const EPS: f32 = 1e-5;

    fn samples() -> Vec<(Vec3, Vec3)> {
        vec![
            (Vec3::ZERO, Vec3::new(0.02, 3.0, 0.01)),
            (Vec3::new(1.0, -2.0, 0.5), Vec3::new(-4.0, 1.0, 2.0)),
            (Vec3::new(0.3, 0.3, 0.3), Vec3::new(0.4, 0.1, 5.0)),
            (Vec3::new(-1.0, 2.0, 3.0), Vec3::new(-1.0, 2.0, 3.0)),
        ]
    }

    #[test]
    fn test_orthogonal_lock_changes_one_axis() {
        for (a, p) in samples() {
            let q = orthogonal_lock(a, p);
            let diff = [(q.x, a.x, p.x), (q.y, a.y, p.y), (q.z, a.z, p.z)];
            let changed = diff.iter().filter(|(q, a, _)| (q - a).abs() > 0.0).count();
            assert!(changed <= 1);
            // Exactly two coordinates stay pinned to the anchor, the third is raw's
            let pinned = diff.iter().filter(|(q, a, _)| q == a).count();
            let from_raw = diff.iter().filter(|(q, _, p)| q == p).count();
            assert!(pinned >= 2 && from_raw >= 1);
        }
    }

    #[test]
    fn test_orthogonal_lock_scenario() {
        let q = orthogonal_lock(Vec3::ZERO, Vec3::new(0.02, 3.0, 0.01));
        assert_eq!(q, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(format!("{:.2}", q.distance(Vec3::ZERO)), "3.00");
    }

    #[test]
    fn test_parallel_alignment_properties() {
        let dirs = [
            Vec3::X,
            Vec3::new(1.0, 1.0, 0.0).normalize(),
            Vec3::new(0.2, -0.5, 0.8).normalize(),
        ];
        for d in dirs {
            for (a, p) in samples() {
                let q = align_parallel(a, p, d);
                assert!((q - a).cross(d).length() < EPS);
                assert!(((q - a).dot(d) - (p - a).dot(d)).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_perpendicular_alignment_properties() {
        let dirs = [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(0.2, -0.5, 0.8).normalize()];
        for d in dirs {
            for (a, p) in samples() {
                let q = align_perpendicular(a, p, d);
                assert!((q - a).dot(d).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_alignment_scenario() {
        let a = Vec3::ZERO;
        let p = Vec3::new(2.0, 2.0, 0.0);
        let q = align_parallel(a, p, Vec3::X);
        assert!((q - Vec3::new(2.0, 0.0, 0.0)).length() < EPS);
        let q = align_perpendicular(a, p, Vec3::X);
        assert!((q - Vec3::new(0.0, 2.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_in_surface_direction() {
        let d = in_surface_direction(Some(Vec3::Y));
        assert!(d.dot(Vec3::Y).abs() < EPS);
        assert!((d.length() - 1.0).abs() < EPS);

        let tilted = Vec3::new(0.3, 0.9, 0.1).normalize();
        assert!(in_surface_direction(Some(tilted)).dot(tilted).abs() < EPS);

        assert_eq!(in_surface_direction(None), Vec3::X);
        assert_eq!(in_surface_direction(Some(Vec3::ZERO)), Vec3::X);
    }

    fn hit_at(point: Vec3, normal: Option<Vec3>) -> PickHit {
        PickHit {
            object_index: 0,
            point,
            normal,
            distance: 1.0,
            triangle_index: 0,
        }
    }

    #[test]
    fn test_derive_from_nearest_mesh_edge() {
        let obj = Pickable::new("box", cube(2.0, 2.0, 2.0, [1.0; 3]));
        // On the top face, close to the edge z = 1 running along X
        let hit = hit_at(Vec3::new(0.4, 1.0, 0.9), Some(Vec3::Y));
        let edge = derive_reference_edge(
            &hit,
            &obj,
            AlignmentMode::Parallel,
            EdgeStrategy::NearestMeshEdge,
        );
        assert!(edge.direction.x.abs() > 1.0 - EPS);
        assert_eq!(edge.mode, AlignmentMode::Parallel);
    }

    #[test]
    fn test_derive_falls_back_to_box_edge() {
        let obj = Pickable::new("box", cube(2.0, 2.0, 2.0, [1.0; 3]));
        // Top-face center is too far from every feature edge
        let hit = hit_at(Vec3::new(0.0, 1.0, 0.6), Some(Vec3::Y));
        let edge = derive_reference_edge(
            &hit,
            &obj,
            AlignmentMode::Perpendicular,
            EdgeStrategy::NearestMeshEdge,
        );
        // Nearest box edge is the top edge at z = 1 along X
        assert!(edge.direction.x.abs() > 1.0 - EPS);
    }

    #[test]
    fn test_derive_from_surface_normal() {
        let obj = Pickable::new("box", cube(2.0, 2.0, 2.0, [1.0; 3]));
        let hit = hit_at(Vec3::new(0.0, 1.0, 0.0), Some(Vec3::Y));
        let edge =
            derive_reference_edge(&hit, &obj, AlignmentMode::Parallel, EdgeStrategy::SurfaceNormal);
        assert!(edge.direction.dot(Vec3::Y).abs() < EPS);
        assert!((edge.start + edge.end - hit.point * 2.0).length() < EPS);
    }

    #[test]
    fn test_derive_without_geometry_uses_fallback() {
        let obj = Pickable::new("empty", MeshData::default());
        let hit = hit_at(Vec3::ZERO, None);
        let edge = derive_reference_edge(
            &hit,
            &obj,
            AlignmentMode::Parallel,
            EdgeStrategy::NearestMeshEdge,
        );
        assert_eq!(edge.direction, Vec3::X);
    }
}
