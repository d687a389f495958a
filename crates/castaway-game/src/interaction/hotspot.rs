//! A single world interaction zone

use glam::Vec3;

use crate::level::HotspotDef;

/// A hotspot instanced from level data
#[derive(Debug, Clone)]
pub struct Hotspot {
    pub def: HotspotDef,
    position: Vec3,
}

impl Hotspot {
    pub fn new(def: HotspotDef) -> Self {
        let position = def.position.into();
        Self { def, position }
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Proximity test against the interaction radius, on the horizontal
    /// plane only (the avatar's height never matters for triggering)
    pub fn is_in_range(&self, point: Vec3) -> bool {
        let dx = point.x - self.position.x;
        let dz = point.z - self.position.z;
        (dx * dx + dz * dz).sqrt() <= self.def.interaction_radius
    }
}
