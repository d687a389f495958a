//! Level data model
//!
//! Levels are JSON documents produced by the authoring pipeline. The runtime
//! parses them into these types and consumes the navmesh, hotspot, and
//! collectible sections itself; background and music definitions are passed
//! through untouched to the rendering/audio collaborators.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A 3-D point as authored in level documents (`{x, y, z}` objects)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Point3> for Vec3 {
    fn from(p: Point3) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

impl From<Vec3> for Point3 {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

/// Scene background, passed through to the rendering boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundDef {
    Color { color: String },
    Image { src: String },
    Video { src: String },
}

/// Level music, passed through to the audio boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicDef {
    pub src: String,
    pub volume: f32,
    #[serde(rename = "loop")]
    pub looping: bool,
}

/// One spoken line in a dialogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
    /// Optional audio cue, played by the audio boundary
    #[serde(default)]
    pub audio: Option<String>,
    /// Advisory display duration; actual pacing is owned by the presentation
    /// boundary
    #[serde(default)]
    pub duration: f32,
}

/// An ordered list of dialogue lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueDef {
    pub lines: Vec<DialogueLine>,
}

/// Destination of a cross-level teleport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeleportTarget {
    pub level_id: String,
    pub spawn_id: String,
}

/// An item that can be held in the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Dialogue and item effects carried by Dialogue/Item hotspots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotEffects {
    /// Primary dialogue, played when the gate is not satisfied (or absent)
    #[serde(default)]
    pub dialogue: Option<DialogueDef>,
    /// Alternate dialogue, played instead when `requires_item` is held
    #[serde(default)]
    pub alternate_dialogue: Option<DialogueDef>,
    /// Inventory gate: the item that unlocks the alternate branch
    #[serde(default)]
    pub requires_item: Option<String>,
    /// Item removed from the inventory when the alternate branch resolves
    #[serde(default)]
    pub consumes_item: Option<String>,
    /// Item granted on resolution
    #[serde(default)]
    pub gives_item: Option<ItemDef>,
}

/// Behavior of a hotspot, keyed by its authored `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HotspotBehavior {
    /// Conversation trigger, optionally gated on inventory state
    Dialogue(HotspotEffects),
    /// Item pickup or exchange; same effect bundle, pickup semantics
    Item(HotspotEffects),
    /// Cross-level teleport
    Teleport { target: TeleportTarget },
}

/// A world interaction zone as authored in level data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotDef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub position: Point3,
    /// Visual indicator radius
    pub radius: f32,
    /// Proximity trigger radius (may be larger than `radius`)
    pub interaction_radius: f32,
    /// Permanently removed once its effects resolve
    #[serde(default)]
    pub one_shot: bool,
    /// Completing the alternate branch wins the game
    #[serde(default)]
    pub victory: bool,
    #[serde(flatten)]
    pub behavior: HotspotBehavior,
}

impl HotspotDef {
    /// Effect bundle for Dialogue/Item hotspots, None for teleports
    pub fn effects(&self) -> Option<&HotspotEffects> {
        match &self.behavior {
            HotspotBehavior::Dialogue(effects) | HotspotBehavior::Item(effects) => Some(effects),
            HotspotBehavior::Teleport { .. } => None,
        }
    }
}

/// A coin collectible placed in the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleDef {
    pub id: String,
    pub position: Point3,
    #[serde(default = "default_collectible_radius")]
    pub radius: f32,
}

fn default_collectible_radius() -> f32 {
    0.6
}

/// Walkable-surface definition: vertices and triangular faces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavMeshDef {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

/// A complete level document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub id: String,
    pub name: String,
    pub background: BackgroundDef,
    #[serde(default)]
    pub music: Option<MusicDef>,
    /// Default spawn point
    pub spawn: Point3,
    pub nav_mesh: NavMeshDef,
    pub hotspots: Vec<HotspotDef>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleDef>,
    /// Named spawn points, selected by teleport destinations
    #[serde(default)]
    pub spawns: HashMap<String, Point3>,
}

impl LevelData {
    /// Resolve a spawn point by id, falling back to the level default
    pub fn spawn_point(&self, spawn_id: Option<&str>) -> Vec3 {
        spawn_id
            .and_then(|id| self.spawns.get(id))
            .copied()
            .unwrap_or(self.spawn)
            .into()
    }
}
