//! World interaction: hotspots, proximity gating, and dialogue sequencing

pub mod dialogue;
pub mod hotspot;
pub mod manager;

pub use dialogue::{DialogueEvent, DialogueSystem};
pub use hotspot::Hotspot;
pub use manager::{HotspotConfig, HotspotManager, InteractionTrigger, ResolveOutcome};
