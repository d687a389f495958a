//! Waypoint-following character controller
//!
//! Idle ⇄ Moving state machine: a path assigned by click-to-move is walked
//! waypoint by waypoint at a fixed linear speed, with the avatar turning
//! smoothly toward the direction of travel. Reaching the last waypoint
//! clears the path and reports the arrival position.

use castaway_core::Transform;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Linear speed in units per second
    pub move_speed: f32,
    /// Rotation damping; the per-tick slerp fraction is `min(1, rotation_speed * dt)`
    pub rotation_speed: f32,
    /// Distance at which a waypoint counts as reached
    pub arrive_epsilon: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.5,
            rotation_speed: 10.0,
            arrive_epsilon: 0.15,
        }
    }
}

/// Avatar movement controller
#[derive(Debug, Clone)]
pub struct CharacterController {
    pub config: MovementConfig,
    transform: Transform,
    waypoints: Vec<Vec3>,
    current_waypoint: usize,
    speed: f32,
}

impl CharacterController {
    pub fn new() -> Self {
        Self::with_config(MovementConfig::default())
    }

    pub fn with_config(config: MovementConfig) -> Self {
        Self {
            config,
            transform: Transform::default(),
            waypoints: Vec::new(),
            current_waypoint: 0,
            speed: 0.0,
        }
    }

    /// Assign a new path, discarding any current one (last click wins).
    /// An empty path is equivalent to `stop()`.
    pub fn set_path(&mut self, waypoints: Vec<Vec3>) {
        self.waypoints = waypoints;
        self.current_waypoint = 0;
        if self.waypoints.is_empty() {
            self.speed = 0.0;
        }
    }

    /// Force Idle, clearing the path
    pub fn stop(&mut self) {
        self.waypoints.clear();
        self.current_waypoint = 0;
        self.speed = 0.0;
    }

    pub fn is_moving(&self) -> bool {
        self.current_waypoint < self.waypoints.len()
    }

    /// Advance along the path. Returns the final position when the last
    /// waypoint is reached this tick.
    pub fn update(&mut self, dt: f32) -> Option<Vec3> {
        if !self.is_moving() {
            self.speed = 0.0;
            return None;
        }

        let target = self.waypoints[self.current_waypoint];
        let mut dir = target - self.transform.position;
        dir.y = 0.0;
        let dist = dir.length();

        if dist < self.config.arrive_epsilon {
            self.current_waypoint += 1;
            if self.current_waypoint >= self.waypoints.len() {
                self.speed = 0.0;
                let arrived_at = self.transform.position;
                self.waypoints.clear();
                self.current_waypoint = 0;
                return Some(arrived_at);
            }
        } else {
            let dir = dir / dist;
            // Never overshoot the waypoint within one tick
            let step = (self.config.move_speed * dt).min(dist);
            self.transform.position += dir * step;
            self.speed = self.config.move_speed;

            let target_rotation = Quat::from_rotation_arc(Vec3::Z, dir);
            let fraction = (self.config.rotation_speed * dt).min(1.0);
            self.transform.rotation = self.transform.rotation.slerp(target_rotation, fraction);
        }

        None
    }

    /// Speed for the current tick (0 when Idle); feeds the animation selector
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn path(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn waypoint_index(&self) -> usize {
        self.current_waypoint
    }
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new()
    }
}
