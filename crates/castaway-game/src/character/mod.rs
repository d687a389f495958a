//! Avatar movement and animation selection

pub mod animation;
pub mod controller;

pub use animation::{AnimationStateMachine, AnimationThresholds};
pub use controller::{CharacterController, MovementConfig};
