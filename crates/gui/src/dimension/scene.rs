//! Rendering adapter for dimension primitives
//!
//! Measurements never hold scene nodes directly. The scene maps opaque
//! handles to primitives; a measurement owns a [`PrimitiveGroup`] of handles
//! and deletion detaches the whole group at once.

use std::collections::BTreeMap;

use glam::Vec3;

/// RGBA color, unmultiplied
pub type Rgba = [u8; 4];

/// Handle to a primitive attached to the [`DimensionScene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveHandle(u64);

/// What a primitive is used for (drives rendering and hit-testing)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveRole {
    DimensionLine,
    Tick,
    EndMarker,
    Label,
    PendingMarker,
    Preview,
    SnapIndicator,
    ReferenceEdge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line { start: Vec3, end: Vec3 },
    Marker { center: Vec3, radius: f32 },
    /// Camera-facing text; `scale` is refreshed every frame
    Label { position: Vec3, text: String, scale: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub color: Rgba,
    pub role: PrimitiveRole,
}

impl Primitive {
    pub fn line(start: Vec3, end: Vec3, color: Rgba, role: PrimitiveRole) -> Self {
        Self {
            shape: Shape::Line { start, end },
            color,
            role,
        }
    }

    pub fn marker(center: Vec3, radius: f32, color: Rgba, role: PrimitiveRole) -> Self {
        Self {
            shape: Shape::Marker { center, radius },
            color,
            role,
        }
    }

    pub fn label(position: Vec3, text: String, color: Rgba, role: PrimitiveRole) -> Self {
        Self {
            shape: Shape::Label {
                position,
                text,
                scale: 1.0,
            },
            color,
            role,
        }
    }
}

/// Handles of primitives that are created and destroyed together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimitiveGroup {
    handles: Vec<PrimitiveHandle>,
}

impl PrimitiveGroup {
    pub fn handles(&self) -> &[PrimitiveHandle] {
        &self.handles
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// A group removed from the scene, keeping its handles for re-attachment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetachedGroup {
    entries: Vec<(PrimitiveHandle, Primitive)>,
}

impl DetachedGroup {
    pub fn entries(&self) -> &[(PrimitiveHandle, Primitive)] {
        &self.entries
    }

    pub fn handles(&self) -> impl Iterator<Item = PrimitiveHandle> + '_ {
        self.entries.iter().map(|(h, _)| *h)
    }

    /// Replace colors for which `color_of` returns Some
    pub fn recolor(&mut self, color_of: impl Fn(PrimitiveHandle) -> Option<Rgba>) {
        for (handle, prim) in &mut self.entries {
            if let Some(color) = color_of(*handle) {
                prim.color = color;
            }
        }
    }
}

/// Flat store of everything the dimension tool draws
#[derive(Debug, Default)]
pub struct DimensionScene {
    nodes: BTreeMap<PrimitiveHandle, Primitive>,
    next_handle: u64,
}

impl DimensionScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, primitive: Primitive) -> PrimitiveHandle {
        self.next_handle += 1;
        let handle = PrimitiveHandle(self.next_handle);
        self.nodes.insert(handle, primitive);
        handle
    }

    pub fn add_group(&mut self, primitives: Vec<Primitive>) -> PrimitiveGroup {
        PrimitiveGroup {
            handles: primitives.into_iter().map(|p| self.add(p)).collect(),
        }
    }

    pub fn remove(&mut self, handle: PrimitiveHandle) -> Option<Primitive> {
        self.nodes.remove(&handle)
    }

    /// Remove every primitive of `group`
    pub fn remove_group(&mut self, group: &PrimitiveGroup) {
        for h in &group.handles {
            self.nodes.remove(h);
        }
    }

    /// Copy of the group's primitives, with their handles
    pub fn snapshot_group(&self, group: &PrimitiveGroup) -> DetachedGroup {
        DetachedGroup {
            entries: group
                .handles
                .iter()
                .filter_map(|h| self.nodes.get(h).map(|p| (*h, p.clone())))
                .collect(),
        }
    }

    /// Detach the group from the scene, returning its primitives
    pub fn detach_group(&mut self, group: &PrimitiveGroup) -> DetachedGroup {
        DetachedGroup {
            entries: group
                .handles
                .iter()
                .filter_map(|h| self.nodes.remove(h).map(|p| (*h, p)))
                .collect(),
        }
    }

    /// Re-attach a detached group under its original handles.
    /// Returns None if any handle is already live.
    pub fn reattach(&mut self, detached: &DetachedGroup) -> Option<PrimitiveGroup> {
        if detached.entries.iter().any(|(h, _)| self.nodes.contains_key(h)) {
            return None;
        }
        for (h, p) in &detached.entries {
            self.nodes.insert(*h, p.clone());
        }
        Some(PrimitiveGroup {
            handles: detached.entries.iter().map(|(h, _)| *h).collect(),
        })
    }

    pub fn get(&self, handle: PrimitiveHandle) -> Option<&Primitive> {
        self.nodes.get(&handle)
    }

    pub fn get_mut(&mut self, handle: PrimitiveHandle) -> Option<&mut Primitive> {
        self.nodes.get_mut(&handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveHandle, &Primitive)> {
        self.nodes.iter().map(|(h, p)| (*h, p))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PrimitiveHandle, &mut Primitive)> {
        self.nodes.iter_mut().map(|(h, p)| (*h, p))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
