use glam::Vec3;

/// Floats per interleaved vertex: position(3) + normal(3) + color(3)
pub const VERTEX_STRIDE: usize = 9;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of vertex `i`, or None when the data is missing or not finite
    pub fn position(&self, i: usize) -> Option<Vec3> {
        let base = i * VERTEX_STRIDE;
        let p = Vec3::new(
            *self.vertices.get(base)?,
            *self.vertices.get(base + 1)?,
            *self.vertices.get(base + 2)?,
        );
        p.is_finite().then_some(p)
    }

    /// Stored normal of vertex `i`, or None when missing or degenerate
    pub fn normal(&self, i: usize) -> Option<Vec3> {
        let base = i * VERTEX_STRIDE;
        let n = Vec3::new(
            *self.vertices.get(base + 3)?,
            *self.vertices.get(base + 4)?,
            *self.vertices.get(base + 5)?,
        );
        n.try_normalize()
    }

    /// Vertex positions of triangle `tri`, None if any index is dangling
    pub fn triangle(&self, tri: usize) -> Option<[Vec3; 3]> {
        let i0 = *self.indices.get(tri * 3)? as usize;
        let i1 = *self.indices.get(tri * 3 + 1)? as usize;
        let i2 = *self.indices.get(tri * 3 + 2)? as usize;
        Some([self.position(i0)?, self.position(i1)?, self.position(i2)?])
    }

    /// Move every vertex by `offset` (meshes are kept in world space)
    pub fn translated(mut self, offset: Vec3) -> Self {
        for chunk in self.vertices.chunks_exact_mut(VERTEX_STRIDE) {
            chunk[0] += offset.x;
            chunk[1] += offset.y;
            chunk[2] += offset.z;
        }
        self
    }
}

// ── Primitive generation (fixture and demo scenes) ──

pub fn cube(w: f32, h: f32, d: f32, color: [f32; 3]) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [([Vec3; 4], Vec3); 6] = [
        // Front (+Z)
        (
            [
                Vec3::new(-hw, -hh, hd),
                Vec3::new(hw, -hh, hd),
                Vec3::new(hw, hh, hd),
                Vec3::new(-hw, hh, hd),
            ],
            Vec3::Z,
        ),
        // Back (-Z)
        (
            [
                Vec3::new(hw, -hh, -hd),
                Vec3::new(-hw, -hh, -hd),
                Vec3::new(-hw, hh, -hd),
                Vec3::new(hw, hh, -hd),
            ],
            Vec3::NEG_Z,
        ),
        // Right (+X)
        (
            [
                Vec3::new(hw, -hh, hd),
                Vec3::new(hw, -hh, -hd),
                Vec3::new(hw, hh, -hd),
                Vec3::new(hw, hh, hd),
            ],
            Vec3::X,
        ),
        // Left (-X)
        (
            [
                Vec3::new(-hw, -hh, -hd),
                Vec3::new(-hw, -hh, hd),
                Vec3::new(-hw, hh, hd),
                Vec3::new(-hw, hh, -hd),
            ],
            Vec3::NEG_X,
        ),
        // Top (+Y)
        (
            [
                Vec3::new(-hw, hh, hd),
                Vec3::new(hw, hh, hd),
                Vec3::new(hw, hh, -hd),
                Vec3::new(-hw, hh, -hd),
            ],
            Vec3::Y,
        ),
        // Bottom (-Y)
        (
            [
                Vec3::new(-hw, -hh, -hd),
                Vec3::new(hw, -hh, -hd),
                Vec3::new(hw, -hh, hd),
                Vec3::new(-hw, -hh, hd),
            ],
            Vec3::NEG_Y,
        ),
    ];

    let mut vertices = Vec::with_capacity(24 * VERTEX_STRIDE);
    let mut indices = Vec::with_capacity(36);

    for (quad, normal) in &faces {
        let base = (vertices.len() / VERTEX_STRIDE) as u32;
        for v in quad {
            push_vert(&mut vertices, v.x, v.y, v.z, *normal, color);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

pub fn cylinder(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let hh = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for i in 0..segments {
        let a0 = (i as f32) * std::f32::consts::TAU / segments as f32;
        let a1 = ((i + 1) as f32) * std::f32::consts::TAU / segments as f32;

        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();
        let n0 = Vec3::new(c0, 0.0, s0);
        let n1 = Vec3::new(c1, 0.0, s1);

        let base = (vertices.len() / VERTEX_STRIDE) as u32;
        push_vert(&mut vertices, radius * c0, -hh, radius * s0, n0, color);
        push_vert(&mut vertices, radius * c1, -hh, radius * s1, n1, color);
        push_vert(&mut vertices, radius * c1, hh, radius * s1, n1, color);
        push_vert(&mut vertices, radius * c0, hh, radius * s0, n0, color);

        indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    add_cap(&mut vertices, &mut indices, radius, hh, segments, Vec3::Y, color, false);
    add_cap(&mut vertices, &mut indices, radius, -hh, segments, Vec3::NEG_Y, color, true);

    MeshData { vertices, indices }
}

pub fn sphere(radius: f32, rings: u32, sectors: u32, color: [f32; 3]) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        let (sp, cp) = phi.sin_cos();

        for s in 0..=sectors {
            let theta = std::f32::consts::TAU * s as f32 / sectors as f32;
            let (st, ct) = theta.sin_cos();
            let n = Vec3::new(sp * ct, cp, sp * st);
            push_vert(&mut vertices, radius * n.x, radius * n.y, radius * n.z, n, color);
        }
    }

    for r in 0..rings {
        for s in 0..sectors {
            let i0 = r * (sectors + 1) + s;
            let i1 = i0 + 1;
            let i2 = i0 + sectors + 1;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i1, i2, i1, i3, i2]);
        }
    }

    MeshData { vertices, indices }
}

// ── Helpers ──────────────────────────────────────────────────

fn push_vert(v: &mut Vec<f32>, px: f32, py: f32, pz: f32, n: Vec3, c: [f32; 3]) {
    v.extend_from_slice(&[px, py, pz, n.x, n.y, n.z, c[0], c[1], c[2]]);
}

#[allow(clippy::too_many_arguments)]
fn add_cap(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    radius: f32,
    y: f32,
    segments: u32,
    normal: Vec3,
    color: [f32; 3],
    reversed: bool,
) {
    let center_idx = (vertices.len() / VERTEX_STRIDE) as u32;
    push_vert(vertices, 0.0, y, 0.0, normal, color);

    for i in 0..segments {
        let angle = (i as f32) * std::f32::consts::TAU / segments as f32;
        push_vert(vertices, radius * angle.cos(), y, radius * angle.sin(), normal, color);
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        if reversed {
            indices.extend_from_slice(&[center_idx, center_idx + 1 + i, center_idx + 1 + next]);
        } else {
            indices.extend_from_slice(&[center_idx, center_idx + 1 + next, center_idx + 1 + i]);
        }
    }
}
