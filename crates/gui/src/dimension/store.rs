//! Arena of committed measurements keyed by id

use std::collections::HashMap;

use glam::Vec3;
use shared::{MeasurementData, MeasurementId};

use super::scene::{DetachedGroup, PrimitiveGroup};

/// A committed two-point measurement. Immutable once committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub id: MeasurementId,
    pub start: Vec3,
    pub end: Vec3,
    pub group: PrimitiveGroup,
}

impl Measurement {
    pub fn distance(&self) -> f32 {
        self.start.distance(self.end)
    }

    pub fn data(&self) -> MeasurementData {
        MeasurementData::new(self.id, self.start.to_array(), self.end.to_array())
    }
}

/// Everything needed to bring a measurement back with the same identity:
/// its id, endpoints and the primitives under their original handles.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSnapshot {
    pub id: MeasurementId,
    pub start: Vec3,
    pub end: Vec3,
    pub primitives: DetachedGroup,
}

impl MeasurementSnapshot {
    pub fn data(&self) -> MeasurementData {
        MeasurementData::new(self.id, self.start.to_array(), self.end.to_array())
    }
}

/// Insertion-ordered measurement arena
#[derive(Debug, Default)]
pub struct MeasurementStore {
    order: Vec<MeasurementId>,
    records: HashMap<MeasurementId, Measurement>,
}

impl MeasurementStore {
    /// Insert a measurement; returns false if the id is already present
    pub fn insert(&mut self, m: Measurement) -> bool {
        if self.records.contains_key(&m.id) {
            return false;
        }
        self.order.push(m.id);
        self.records.insert(m.id, m);
        true
    }

    pub fn remove(&mut self, id: &MeasurementId) -> Option<Measurement> {
        let m = self.records.remove(id)?;
        self.order.retain(|o| o != id);
        Some(m)
    }

    pub fn get(&self, id: &MeasurementId) -> Option<&Measurement> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &MeasurementId) -> bool {
        self.records.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Measurement> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|id| self.records.remove(&id))
            .collect()
    }
}
