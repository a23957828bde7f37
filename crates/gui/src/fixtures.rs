//! Factory functions for pickable test and demo scenes.

use glam::Vec3;

use crate::viewport::mesh::{cube, cylinder, sphere};
use crate::viewport::picking::Pickable;

const BOX_COLOR: [f32; 3] = [0.62, 0.66, 0.72];
const CYLINDER_COLOR: [f32; 3] = [0.55, 0.70, 0.60];
const SPHERE_COLOR: [f32; 3] = [0.75, 0.62, 0.55];

// ── Object factories ────────────────────────────────────────────

/// Box of size `w` x `h` x `d` centered at `pos`.
pub fn box_at(id: &str, w: f32, h: f32, d: f32, pos: [f32; 3]) -> Pickable {
    Pickable::new(id, cube(w, h, d, BOX_COLOR).translated(Vec3::from_array(pos)))
}

/// Upright cylinder centered at `pos`.
pub fn cylinder_at(id: &str, r: f32, h: f32, pos: [f32; 3]) -> Pickable {
    Pickable::new(id, cylinder(r, h, 32, CYLINDER_COLOR).translated(Vec3::from_array(pos)))
}

/// Sphere centered at `pos`.
pub fn sphere_at(id: &str, r: f32, pos: [f32; 3]) -> Pickable {
    Pickable::new(id, sphere(r, 16, 24, SPHERE_COLOR).translated(Vec3::from_array(pos)))
}

// ── Scene factories ─────────────────────────────────────────────

/// A 2x2x2 box at the origin. Its top face is at y = 1.
pub fn single_box() -> Vec<Pickable> {
    vec![box_at("box", 2.0, 2.0, 2.0, [0.0; 3])]
}

/// Demo scene shown by the viewer on startup.
pub fn demo_scene() -> Vec<Pickable> {
    vec![
        box_at("base", 4.0, 0.5, 3.0, [0.0, -0.25, 0.0]),
        box_at("block", 1.5, 1.5, 1.5, [-0.8, 0.75, -0.4]),
        cylinder_at("post", 0.4, 2.0, [1.2, 1.0, 0.6]),
        sphere_at("ball", 0.5, [3.5, 0.5, 0.0]),
    ]
}
