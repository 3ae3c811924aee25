//! Interactive zones
//!
//! Rectangles on the ground plane that report when the vehicle enters or
//! leaves them.

use drivescape_math::Vec2;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key for a zone in [`Areas`]
    pub struct ZoneKey;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneEvent {
    In,
    Out,
}

#[derive(Clone, Debug)]
pub struct Zone {
    pub position: Vec2,
    pub half_extents: Vec2,
    active: bool,
    inside: bool,
}

impl Zone {
    pub fn new(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            half_extents,
            active: true,
            inside: false,
        }
    }

    /// Edges count as inside
    pub fn contains(&self, point: Vec2) -> bool {
        (point.x - self.position.x).abs() <= self.half_extents.x
            && (point.y - self.position.y).abs() <= self.half_extents.y
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }
}

/// Every zone in the city
#[derive(Clone, Debug, Default)]
pub struct Areas {
    zones: SlotMap<ZoneKey, Zone>,
}

impl Areas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, position: Vec2, half_extents: Vec2) -> ZoneKey {
        self.zones.insert(Zone::new(position, half_extents))
    }

    pub fn remove(&mut self, key: ZoneKey) -> Option<Zone> {
        self.zones.remove(key)
    }

    pub fn get(&self, key: ZoneKey) -> Option<&Zone> {
        self.zones.get(key)
    }

    pub fn activate(&mut self, key: ZoneKey) {
        if let Some(zone) = self.zones.get_mut(key) {
            zone.active = true;
        }
    }

    /// An inactive zone reports `Out` on the next update if the vehicle was
    /// inside, then stays silent
    pub fn deactivate(&mut self, key: ZoneKey) {
        if let Some(zone) = self.zones.get_mut(key) {
            zone.active = false;
        }
    }

    /// Test `point` against every zone and return the transitions
    pub fn update(&mut self, point: Vec2) -> Vec<(ZoneKey, ZoneEvent)> {
        let mut events = Vec::new();
        for (key, zone) in self.zones.iter_mut() {
            let inside = zone.active && zone.contains(point);
            if inside != zone.inside {
                zone.inside = inside;
                events.push((key, if inside { ZoneEvent::In } else { ZoneEvent::Out }));
            }
        }
        events
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneKey, &Zone)> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
