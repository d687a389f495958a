//! Castaway Game - Runtime core for the Castaway point-and-click adventure
//!
//! Provides walkable-surface pathfinding, click-to-move avatar control,
//! speed-driven animation selection, proximity-triggered hotspots with
//! inventory gating, and an externally paced dialogue sequencer, composed
//! by a single fixed-order tick driver (`GameSession`).

pub mod character;
pub mod interaction;
pub mod inventory;
pub mod level;
pub mod navigation;
pub mod session;

pub use character::{AnimationStateMachine, AnimationThresholds, CharacterController, MovementConfig};
pub use interaction::{
    DialogueEvent, DialogueSystem, Hotspot, HotspotConfig, HotspotManager, InteractionTrigger,
    ResolveOutcome,
};
pub use inventory::Inventory;
pub use level::{
    BackgroundDef, CollectibleDef, DialogueDef, DialogueLine, HotspotBehavior, HotspotDef,
    HotspotEffects, ItemDef, LevelData, MusicDef, NavMeshDef, Point3, TeleportTarget,
};
pub use navigation::{ClickToMove, NavMesh, NavMeshError, Ray};
pub use session::{GameSession, SessionEvent};
