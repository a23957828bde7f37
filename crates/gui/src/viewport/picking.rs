//! Ray casting against pickable meshes and dimension primitives

use glam::Vec3;

use super::mesh::MeshData;

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Compute AABB from the mesh's valid vertex positions
    pub fn from_mesh(data: &MeshData) -> Option<Self> {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut any = false;

        for i in 0..data.vertex_count() {
            if let Some(p) = data.position(i) {
                min = min.min(p);
                max = max.max(p);
                any = true;
            }
        }

        any.then_some(Self { min, max })
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The eight corners, min corner first
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// The twelve box edges as (start, end) pairs
    pub fn edges(&self) -> [(Vec3, Vec3); 12] {
        let c = self.corners();
        [
            // along X
            (c[0], c[1]),
            (c[2], c[3]),
            (c[4], c[5]),
            (c[6], c[7]),
            // along Y
            (c[0], c[2]),
            (c[1], c[3]),
            (c[4], c[6]),
            (c[5], c[7]),
            // along Z
            (c[0], c[4]),
            (c[1], c[5]),
            (c[2], c[6]),
            (c[3], c[7]),
        ]
    }
}

/// An object the host offers for picking, with world-space geometry
#[derive(Clone, Debug)]
pub struct Pickable {
    pub id: String,
    pub mesh: MeshData,
    /// None when the mesh has no usable vertex data
    pub aabb: Option<Aabb>,
}

impl Pickable {
    pub fn new(id: impl Into<String>, mesh: MeshData) -> Self {
        let aabb = Aabb::from_mesh(&mesh);
        Self {
            id: id.into(),
            mesh,
            aabb,
        }
    }
}

/// Nearest hit of a ray against a list of pickables
#[derive(Clone, Debug)]
pub struct PickHit {
    /// Index into the pickable slice that was searched
    pub object_index: usize,
    pub point: Vec3,
    /// Surface normal at the hit, if the mesh provides one
    pub normal: Option<Vec3>,
    /// Distance from ray origin to hit point
    pub distance: f32,
    pub triangle_index: usize,
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Find the nearest triangle hit in a single mesh.
fn pick_triangle(ray: &Ray, mesh: &MeshData) -> Option<(usize, f32, Option<Vec3>)> {
    let mut best: Option<(usize, f32, Option<Vec3>)> = None;

    for tri_idx in 0..mesh.triangle_count() {
        // Triangles with missing vertex data are skipped
        let Some([v0, v1, v2]) = mesh.triangle(tri_idx) else {
            continue;
        };

        if let Some(dist) = ray_triangle_intersect(ray, v0, v1, v2) {
            if best.as_ref().is_none_or(|b| dist < b.1) {
                let normal = mesh
                    .normal(mesh.indices[tri_idx * 3] as usize)
                    .or_else(|| (v1 - v0).cross(v2 - v0).try_normalize());
                best = Some((tri_idx, dist, normal));
            }
        }
    }

    best
}

/// Cast `ray` against `objects` and return the nearest surface hit.
///
/// An empty list or a miss yields None; that is not an error.
pub fn pick_object(ray: &Ray, objects: &[Pickable]) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;

    for (object_index, object) in objects.iter().enumerate() {
        let Some(aabb) = object.aabb.as_ref() else {
            continue;
        };
        let Some(box_dist) = ray_aabb(ray, aabb) else {
            continue;
        };
        if best.as_ref().is_some_and(|b| box_dist > b.distance) {
            continue;
        }

        if let Some((triangle_index, distance, normal)) = pick_triangle(ray, &object.mesh) {
            if best.as_ref().is_none_or(|b| distance < b.distance) {
                best = Some(PickHit {
                    object_index,
                    point: ray.at(distance),
                    normal,
                    distance,
                    triangle_index,
                });
            }
        }
    }

    best
}

/// Distance from `point` to segment `a`-`b`.
///
/// The projection parameter is clamped to [0, 1].
pub fn point_segment_distance(point: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Closest approach between a ray and a segment.
/// Returns (distance between the two closest points, ray parameter).
pub fn ray_segment_distance(ray: &Ray, a: Vec3, b: Vec3) -> (f32, f32) {
    let d1 = ray.direction;
    let d2 = b - a;
    let r = ray.origin - a;

    let aa = d1.dot(d1);
    let ee = d2.dot(d2);
    let f = d2.dot(r);

    if ee < 1e-12 {
        let t = (-(d1.dot(r)) / aa).max(0.0);
        return (ray.at(t).distance(a), t);
    }

    let c = d1.dot(r);
    let bb = d1.dot(d2);
    let denom = aa * ee - bb * bb;

    // Ray parameter t >= 0, segment parameter s in [0, 1]
    let mut t = if denom.abs() > 1e-12 {
        ((bb * f - c * ee) / denom).max(0.0)
    } else {
        0.0
    };
    let mut s = (bb * t + f) / ee;
    if s < 0.0 {
        s = 0.0;
        t = (-c / aa).max(0.0);
    } else if s > 1.0 {
        s = 1.0;
        t = ((bb - c) / aa).max(0.0);
    }

    let on_ray = ray.at(t);
    let on_segment = a + d2 * s;
    (on_ray.distance(on_segment), t)
}

/// Ray-sphere intersection, returning the entry distance
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    let b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t0 = (-b - sq) / a;
    let t1 = (-b + sq) / a;
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1)
    } else {
        None
    }
}
