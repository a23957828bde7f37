//! Hit-testing and highlighting of committed measurements

use std::collections::HashMap;

use glam::Vec2;
use shared::MeasurementId;

use super::scene::{DimensionScene, PrimitiveHandle, Rgba, Shape};
use super::store::MeasurementStore;
use super::visual::HIGHLIGHT_COLOR;
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::picking::{ray_segment_distance, ray_sphere, Ray};

/// World-space tolerance around lines and ticks
pub const LINE_PICK_TOLERANCE: f32 = 0.08;

/// NDC-space tolerance around billboard labels
pub const LABEL_PICK_TOLERANCE: f32 = 0.05;

/// Pointer state needed for hit-testing: the world ray and its NDC origin
pub struct PickQuery<'a> {
    pub ray: Ray,
    pub ndc: Vec2,
    pub camera: &'a ArcBallCamera,
    pub aspect: f32,
}

/// The committed measurement under the pointer, nearest by ray distance.
///
/// Lines and markers are tested in 3D. Labels always face the camera, so
/// they are tested in NDC against the pointer instead.
pub fn pick_measurement(
    query: &PickQuery<'_>,
    store: &MeasurementStore,
    scene: &DimensionScene,
) -> Option<MeasurementId> {
    let mut best: Option<(MeasurementId, f32)> = None;

    for m in store.iter() {
        for handle in m.group.handles() {
            let Some(prim) = scene.get(*handle) else {
                continue;
            };
            let Some(dist) = hit_distance(query, &prim.shape) else {
                continue;
            };
            if best.as_ref().is_none_or(|(_, d)| dist < *d) {
                best = Some((m.id, dist));
            }
        }
    }

    best.map(|(id, _)| id)
}

fn hit_distance(query: &PickQuery<'_>, shape: &Shape) -> Option<f32> {
    match shape {
        Shape::Line { start, end } => {
            let (gap, t) = ray_segment_distance(&query.ray, *start, *end);
            (gap <= LINE_PICK_TOLERANCE).then_some(t)
        }
        Shape::Marker { center, radius } => {
            ray_sphere(&query.ray, *center, radius.max(LINE_PICK_TOLERANCE))
        }
        Shape::Label { position, .. } => {
            let ndc = query.camera.project_ndc(*position, query.aspect)?;
            (ndc.distance(query.ndc) <= LABEL_PICK_TOLERANCE)
                .then(|| query.ray.origin.distance(*position))
        }
    }
}

/// Recolors measurement primitives and remembers their original colors
#[derive(Debug, Default)]
pub struct Highlighter {
    originals: HashMap<MeasurementId, Vec<(PrimitiveHandle, Rgba)>>,
}

impl Highlighter {
    pub fn is_highlighted(&self, id: &MeasurementId) -> bool {
        self.originals.contains_key(id)
    }

    /// Highlight or restore `id`. Repeated calls with the same `on` are no-ops.
    pub fn set(
        &mut self,
        id: MeasurementId,
        on: bool,
        store: &MeasurementStore,
        scene: &mut DimensionScene,
    ) -> bool {
        if on {
            if self.originals.contains_key(&id) {
                return true;
            }
            let Some(m) = store.get(&id) else {
                return false;
            };
            let mut saved = Vec::with_capacity(m.group.handles().len());
            for handle in m.group.handles() {
                if let Some(prim) = scene.get_mut(*handle) {
                    saved.push((*handle, prim.color));
                    prim.color = HIGHLIGHT_COLOR;
                }
            }
            self.originals.insert(id, saved);
            true
        } else {
            let Some(saved) = self.originals.remove(&id) else {
                return false;
            };
            for (handle, color) in saved {
                if let Some(prim) = scene.get_mut(handle) {
                    prim.color = color;
                }
            }
            true
        }
    }

    /// Original color of `handle` if it is currently highlighted
    pub fn original_color(&self, id: &MeasurementId, handle: PrimitiveHandle) -> Option<Rgba> {
        self.originals
            .get(id)?
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, c)| *c)
    }

    pub fn clear(&mut self) {
        self.originals.clear();
    }
}
