//! Edge extraction for triangle meshes
//!
//! Used to infer reference edges for aligned dimensions: the mesh edge
//! nearest to a picked point gives the reference direction.

use std::collections::HashMap;

use glam::Vec3;

use super::mesh::MeshData;
use super::picking::point_segment_distance;

/// Represents an edge in a mesh
#[derive(Debug, Clone)]
pub struct MeshEdge {
    pub start: Vec3,
    pub end: Vec3,
    pub normal1: Vec3,
    pub normal2: Option<Vec3>,
}

impl MeshEdge {
    /// Calculate the angle between adjacent faces (in radians)
    pub fn dihedral_angle(&self) -> f32 {
        if let Some(n2) = self.normal2 {
            self.normal1.dot(n2).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        }
    }

    /// Check if this is a "sharp" edge (faces meet at angle)
    pub fn is_sharp(&self, threshold_degrees: f32) -> bool {
        self.normal2.is_none() || self.dihedral_angle().to_degrees() > threshold_degrees
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

type QuantizedPos = (i64, i64, i64);

fn quantize_position(pos: Vec3) -> QuantizedPos {
    let scale = 10000.0;
    (
        (pos.x * scale).round() as i64,
        (pos.y * scale).round() as i64,
        (pos.z * scale).round() as i64,
    )
}

fn edge_key(p1: QuantizedPos, p2: QuantizedPos) -> (QuantizedPos, QuantizedPos) {
    if p1 < p2 { (p1, p2) } else { (p2, p1) }
}

/// Extract all unique edges from a mesh.
/// Triangles with missing vertex data are skipped.
pub fn extract_edges(mesh: &MeshData) -> Vec<MeshEdge> {
    let mut edge_map: HashMap<(QuantizedPos, QuantizedPos), MeshEdge> = HashMap::new();

    for tri_idx in 0..mesh.triangle_count() {
        let Some([v0, v1, v2]) = mesh.triangle(tri_idx) else {
            continue;
        };
        let Some(normal) = (v1 - v0).cross(v2 - v0).try_normalize() else {
            continue;
        };

        let q0 = quantize_position(v0);
        let q1 = quantize_position(v1);
        let q2 = quantize_position(v2);

        for (qa, qb, va, vb) in [(q0, q1, v0, v1), (q1, q2, v1, v2), (q2, q0, v2, v0)] {
            edge_map
                .entry(edge_key(qa, qb))
                .and_modify(|e| {
                    if e.normal2.is_none() {
                        e.normal2 = Some(normal);
                    }
                })
                .or_insert(MeshEdge {
                    start: va,
                    end: vb,
                    normal1: normal,
                    normal2: None,
                });
        }
    }

    edge_map.into_values().collect()
}

/// Extract only sharp edges (feature lines, not triangulation diagonals)
pub fn extract_sharp_edges(mesh: &MeshData, threshold_degrees: f32) -> Vec<MeshEdge> {
    extract_edges(mesh)
        .into_iter()
        .filter(|e| e.is_sharp(threshold_degrees))
        .collect()
}

/// The edge nearest to `point`, if within `max_distance`
pub fn nearest_edge(point: Vec3, edges: &[MeshEdge], max_distance: f32) -> Option<&MeshEdge> {
    edges
        .iter()
        .filter(|e| e.length() > 1e-6)
        .map(|e| (e, point_segment_distance(point, e.start, e.end)))
        .filter(|(_, d)| *d <= max_distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh::cube;

    #[test]
    fn test_quantize_position() {
        let p1 = Vec3::new(1.0, 2.0, 3.0);
        let p2 = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(quantize_position(p1), quantize_position(p2));
    }

    #[test]
    fn test_dihedral_angle() {
        let edge = MeshEdge {
            start: Vec3::ZERO,
            end: Vec3::X,
            normal1: Vec3::Y,
            normal2: Some(Vec3::Z),
        };
        let angle = edge.dihedral_angle().to_degrees();
        assert!((angle - 90.0).abs() < 0.1);
    }

    #[test]
    fn test_cube_sharp_edges_skip_diagonals() {
        let mesh = cube(2.0, 2.0, 2.0, [1.0; 3]);
        // 12 box edges + 6 face diagonals
        assert_eq!(extract_edges(&mesh).len(), 18);
        assert_eq!(extract_sharp_edges(&mesh, 30.0).len(), 12);
    }

    #[test]
    fn test_nearest_edge() {
        let mesh = cube(2.0, 2.0, 2.0, [1.0; 3]);
        let edges = extract_sharp_edges(&mesh, 30.0);
        // Near the top-front edge running along X
        let e = nearest_edge(Vec3::new(0.3, 1.0, 0.95), &edges, 0.2).unwrap();
        let dir = (e.end - e.start).normalize();
        assert!(dir.x.abs() > 0.999);
        assert!(nearest_edge(Vec3::new(0.0, 1.0, 0.0), &edges, 0.2).is_none());
    }
}
