//! Click-to-move adapter
//!
//! Translates a pointer pick ray into a navmesh path request and hands the
//! result to the character controller. Clicks that miss the surface or
//! resolve to no path are ignored; the last click always wins.

use crate::character::CharacterController;

use super::navmesh::{NavMesh, Ray};

/// Thin adapter between the input boundary and the pathfinder
#[derive(Debug)]
pub struct ClickToMove {
    enabled: bool,
}

impl ClickToMove {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Enable or disable click acceptance (disabled during dialogue and
    /// level transitions)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Resolve a click against the navmesh and route the resulting path to
    /// the controller. Returns true if a new path was set.
    pub fn handle_click(
        &self,
        ray: Ray,
        nav_mesh: &NavMesh,
        character: &mut CharacterController,
    ) -> bool {
        if !self.enabled {
            return false;
        }

        let Some(target) = nav_mesh.raycast(ray) else {
            return false;
        };

        match nav_mesh.find_path(character.position(), target) {
            Some(path) if !path.is_empty() => {
                character.set_path(path);
                true
            }
            _ => false,
        }
    }
}

impl Default for ClickToMove {
    fn default() -> Self {
        Self::new()
    }
}
