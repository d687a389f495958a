//! Game session driver
//!
//! The single ownership root for the runtime core. Owns the navmesh,
//! character, animation selector, hotspot manager, dialogue sequencer, and
//! inventory, and ticks them in a fixed order: movement, then animation,
//! then hotspot proximity (evaluated against the position movement just
//! produced). All outward effects surface as `SessionEvent`s; the embedder
//! renders, plays audio, and loads levels in response.

use castaway_core::{GameTime, TimeConfig, Transform, Vec3};

use crate::character::{AnimationStateMachine, CharacterController};
use crate::interaction::{
    DialogueEvent, DialogueSystem, HotspotManager, InteractionTrigger, ResolveOutcome,
};
use crate::inventory::Inventory;
use crate::level::{LevelData, TeleportTarget};
use crate::navigation::{ClickToMove, NavMesh, NavMeshError, Ray};

/// Outbound notifications for the embedding boundaries
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The avatar reached the end of its path
    Arrived { position: Vec3 },
    /// A dialogue session began; the presentation boundary shows its box
    DialogueStarted,
    /// Show this line (and play its audio cue, if any)
    DialogueLine {
        speaker: String,
        text: String,
        audio: Option<String>,
    },
    /// The dialogue session ended; hide the box
    DialogueEnded,
    /// Load another level and reinstall it into this session
    Teleport(TeleportTarget),
    /// The game was won
    Victory,
    /// A coin was picked up
    CoinCollected { id: String },
    /// A one-shot hotspot resolved; despawn its visuals
    HotspotRemoved { id: String },
}

/// Owning driver for the runtime core
#[derive(Debug)]
pub struct GameSession {
    time: GameTime,
    nav_mesh: Option<NavMesh>,
    click_to_move: ClickToMove,
    character: CharacterController,
    animation: AnimationStateMachine,
    hotspots: HotspotManager,
    dialogue: DialogueSystem,
    inventory: Inventory,
    in_transition: bool,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            time: GameTime::new(TimeConfig::default()),
            nav_mesh: None,
            click_to_move: ClickToMove::new(),
            character: CharacterController::new(),
            animation: AnimationStateMachine::new(),
            hotspots: HotspotManager::new(),
            dialogue: DialogueSystem::new(),
            inventory: Inventory::new(),
            in_transition: false,
        }
    }

    /// Install a level: build its navmesh, load hotspots and collectibles,
    /// and place the avatar at the requested spawn.
    ///
    /// The navmesh is built before anything else is touched; an invalid
    /// definition fails the whole install and leaves the previous level
    /// intact.
    pub fn install_level(
        &mut self,
        level: &LevelData,
        spawn_id: Option<&str>,
    ) -> Result<(), NavMeshError> {
        let nav_mesh = NavMesh::build(&level.nav_mesh.vertices, &level.nav_mesh.faces)?;

        self.nav_mesh = Some(nav_mesh);
        self.hotspots.load(&level.hotspots, &level.collectibles);
        self.dialogue = DialogueSystem::new();

        let spawn = level.spawn_point(spawn_id);
        self.character.stop();
        self.character.set_position(spawn);

        self.in_transition = false;
        self.click_to_move.set_enabled(true);

        tracing::info!(level = %level.id, ?spawn, "level installed");
        Ok(())
    }

    /// Route a pointer click into a path request. Returns true if the avatar
    /// got a new path; misses and clicks during dialogue or a transition are
    /// ignored.
    pub fn pointer_click(&mut self, ray: Ray) -> bool {
        let Some(nav_mesh) = &self.nav_mesh else {
            return false;
        };
        self.click_to_move
            .handle_click(ray, nav_mesh, &mut self.character)
    }

    /// Advance the active dialogue; called by the presentation boundary when
    /// the player continues
    pub fn advance_dialogue(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let dialogue_events = self.dialogue.advance();
        self.ingest_dialogue_events(dialogue_events, &mut events);
        events
    }

    /// One simulation tick. `raw_dt` is clamped (0.1 s max) before use.
    pub fn update(&mut self, raw_dt: f32) -> Vec<SessionEvent> {
        self.time.update(raw_dt);
        let dt = self.time.delta_time;
        let mut events = Vec::new();

        // Movement, suppressed while a dialogue or level transition is in
        // flight
        if !self.dialogue.is_active() && !self.in_transition {
            if let Some(position) = self.character.update(dt) {
                events.push(SessionEvent::Arrived { position });
            }
        }

        // Animation always follows the reported speed, even when idle
        self.animation.update_by_speed(self.character.speed());
        self.animation.update(dt);

        // Proximity against the position movement just produced
        let triggers = self
            .hotspots
            .update(dt, self.character.position(), &mut self.inventory);
        for trigger in triggers {
            match trigger {
                InteractionTrigger::Teleport(target) => {
                    self.in_transition = true;
                    self.click_to_move.set_enabled(false);
                    self.character.stop();
                    events.push(SessionEvent::Teleport(target));
                }
                InteractionTrigger::Dialogue { dialogue, .. } => {
                    self.character.stop();
                    self.click_to_move.set_enabled(false);
                    let dialogue_events = self.dialogue.start(&dialogue);
                    self.ingest_dialogue_events(dialogue_events, &mut events);
                }
                InteractionTrigger::CoinCollected { id } => {
                    events.push(SessionEvent::CoinCollected { id });
                }
            }
        }

        events
    }

    pub fn is_in_dialogue(&self) -> bool {
        self.dialogue.is_active()
    }

    pub fn is_in_transition(&self) -> bool {
        self.in_transition
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn avatar_transform(&self) -> &Transform {
        self.character.transform()
    }

    pub fn character(&self) -> &CharacterController {
        &self.character
    }

    pub fn nav_mesh(&self) -> Option<&NavMesh> {
        self.nav_mesh.as_ref()
    }

    pub fn hotspot_manager(&self) -> &HotspotManager {
        &self.hotspots
    }

    pub fn animation(&self) -> &AnimationStateMachine {
        &self.animation
    }

    /// Mutable animation access for the asset boundary to register clips
    /// from the loaded character model
    pub fn animation_mut(&mut self) -> &mut AnimationStateMachine {
        &mut self.animation
    }

    fn ingest_dialogue_events(
        &mut self,
        dialogue_events: Vec<DialogueEvent>,
        events: &mut Vec<SessionEvent>,
    ) {
        for event in dialogue_events {
            match event {
                DialogueEvent::Started => events.push(SessionEvent::DialogueStarted),
                DialogueEvent::Line { speaker, text, audio } => {
                    events.push(SessionEvent::DialogueLine { speaker, text, audio });
                }
                DialogueEvent::Ended => {
                    events.push(SessionEvent::DialogueEnded);
                    for outcome in self.hotspots.resolve_dialogue_end(&mut self.inventory) {
                        match outcome {
                            ResolveOutcome::Victory => events.push(SessionEvent::Victory),
                            ResolveOutcome::HotspotRemoved { id } => {
                                events.push(SessionEvent::HotspotRemoved { id });
                            }
                        }
                    }
                    if !self.in_transition {
                        self.click_to_move.set_enabled(true);
                    }
                }
            }
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
