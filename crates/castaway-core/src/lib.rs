//! Castaway Core - Core types and utilities for the Castaway runtime
//!
//! This crate provides the foundational types used throughout the runtime:
//! - Mathematical primitives (re-exported from glam)
//! - Transform component for avatar and hotspot placement
//! - Time system with frame-delta clamping

pub mod time;
pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use time::{GameTime, TimeConfig};
pub use types::Transform;
