//! Hotspot proximity and gating
//!
//! Owns the live hotspot and collectible sets for the current level. Each
//! tick it tests avatar proximity, fires the trigger protocol on range entry,
//! and resolves the pending action once the dialogue it started finishes.
//!
//! At most one `PendingAction` exists at a time: while one is outstanding the
//! avatar cannot move (the session suppresses path clicks during dialogue)
//! and proximity triggering is suppressed here as well.

use std::collections::HashSet;

use glam::Vec3;

use crate::interaction::hotspot::Hotspot;
use crate::inventory::Inventory;
use crate::level::{CollectibleDef, DialogueDef, HotspotBehavior, HotspotDef, TeleportTarget};

/// Hotspot manager tunables
#[derive(Debug, Clone)]
pub struct HotspotConfig {
    /// Grace period after level load before proximity can trigger, so a
    /// spawn point inside a hotspot does not fire it instantly
    pub load_cooldown: f32,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self { load_cooldown: 1.0 }
    }
}

/// What a proximity trigger asks the session to do
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionTrigger {
    /// Leave for another level; no dialogue, no pending action
    Teleport(TeleportTarget),
    /// Start the selected dialogue branch
    Dialogue {
        hotspot_id: String,
        dialogue: DialogueDef,
        used_alternate: bool,
    },
    /// A coin collectible was picked up
    CoinCollected { id: String },
}

/// Effects applied when a dialogue session resolves
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    /// The victory-flagged alternate branch completed
    Victory,
    /// A one-shot hotspot was permanently removed
    HotspotRemoved { id: String },
}

/// Links the active dialogue session back to the hotspot that started it
#[derive(Debug, Clone)]
struct PendingAction {
    hotspot_id: String,
    used_alternate: bool,
}

/// A coin placed in the level
#[derive(Debug, Clone)]
struct Collectible {
    def: CollectibleDef,
    position: Vec3,
}

impl Collectible {
    fn is_in_range(&self, point: Vec3) -> bool {
        let dx = point.x - self.position.x;
        let dz = point.z - self.position.z;
        (dx * dx + dz * dz).sqrt() <= self.def.radius
    }
}

/// Owns the interaction zones and runs the trigger/gating protocol
#[derive(Debug, Default)]
pub struct HotspotManager {
    config: HotspotConfig,
    hotspots: Vec<Hotspot>,
    collectibles: Vec<Collectible>,
    /// Hotspots currently holding a fired trigger; cleared when the avatar
    /// leaves range so re-entry fires again
    triggered: HashSet<String>,
    /// One-shot hotspots resolved this session; they stay gone across level
    /// reloads
    removed: HashSet<String>,
    /// Coin ids collected this session
    collected: HashSet<String>,
    cooldown: f32,
    pending: Option<PendingAction>,
}

impl HotspotManager {
    pub fn new() -> Self {
        Self::with_config(HotspotConfig::default())
    }

    pub fn with_config(config: HotspotConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Install the hotspot and collectible sets for a freshly loaded level.
    /// Hotspots removed earlier this session and coins already collected are
    /// filtered out.
    pub fn load(&mut self, hotspots: &[HotspotDef], collectibles: &[CollectibleDef]) {
        self.hotspots = hotspots
            .iter()
            .filter(|def| !self.removed.contains(&def.id))
            .cloned()
            .map(Hotspot::new)
            .collect();
        self.collectibles = collectibles
            .iter()
            .filter(|def| !self.collected.contains(&def.id))
            .map(|def| Collectible {
                position: def.position.into(),
                def: def.clone(),
            })
            .collect();
        self.triggered.clear();
        self.pending = None;
        self.cooldown = self.config.load_cooldown;
    }

    /// Per-tick proximity pass. Collectible pickup runs unconditionally;
    /// hotspot triggering waits out the post-load cooldown and is suppressed
    /// while a pending action is outstanding.
    pub fn update(
        &mut self,
        dt: f32,
        avatar_pos: Vec3,
        inventory: &mut Inventory,
    ) -> Vec<InteractionTrigger> {
        let mut triggers = Vec::new();

        self.collect_coins(avatar_pos, inventory, &mut triggers);

        if self.cooldown > 0.0 {
            self.cooldown -= dt;
            return triggers;
        }

        for i in 0..self.hotspots.len() {
            let id = self.hotspots[i].id().to_string();
            if self.hotspots[i].is_in_range(avatar_pos) {
                if !self.triggered.contains(&id) && self.pending.is_none() {
                    self.triggered.insert(id);
                    if let Some(trigger) = self.fire(i, inventory) {
                        triggers.push(trigger);
                    }
                }
            } else {
                self.triggered.remove(&id);
            }
        }

        triggers
    }

    /// Resolve the pending action after its dialogue session ended
    pub fn resolve_dialogue_end(&mut self, inventory: &mut Inventory) -> Vec<ResolveOutcome> {
        let Some(pending) = self.pending.take() else {
            return Vec::new();
        };
        let mut outcomes = Vec::new();

        let Some(index) = self
            .hotspots
            .iter()
            .position(|h| h.id() == pending.hotspot_id)
        else {
            return outcomes;
        };
        let hotspot = &self.hotspots[index];
        let effects = hotspot.def.effects().cloned().unwrap_or_default();

        if pending.used_alternate {
            if let Some(consumed) = &effects.consumes_item {
                inventory.remove_item(consumed);
            }
            if let Some(granted) = &effects.gives_item {
                inventory.add_item(granted.clone());
            }
            if hotspot.def.victory {
                tracing::info!(hotspot = %pending.hotspot_id, "victory condition met");
                outcomes.push(ResolveOutcome::Victory);
            }
        } else if matches!(hotspot.def.behavior, HotspotBehavior::Item(_))
            && effects.requires_item.is_none()
        {
            // Simple ungated pickup
            if let Some(granted) = &effects.gives_item {
                inventory.add_item(granted.clone());
            }
        }

        if hotspot.def.one_shot {
            let id = pending.hotspot_id.clone();
            tracing::info!(hotspot = %id, "one-shot hotspot removed");
            self.removed.insert(id.clone());
            self.triggered.remove(&id);
            self.hotspots.remove(index);
            outcomes.push(ResolveOutcome::HotspotRemoved { id });
        }

        outcomes
    }

    /// Whether a dialogue started here is still unresolved
    pub fn has_pending_action(&self) -> bool {
        self.pending.is_some()
    }

    /// Still-present hotspots, for the rendering boundary
    pub fn hotspots(&self) -> impl Iterator<Item = &Hotspot> {
        self.hotspots.iter()
    }

    /// Uncollected coins, for the rendering boundary
    pub fn collectibles(&self) -> impl Iterator<Item = &CollectibleDef> {
        self.collectibles.iter().map(|c| &c.def)
    }

    fn collect_coins(
        &mut self,
        avatar_pos: Vec3,
        inventory: &mut Inventory,
        triggers: &mut Vec<InteractionTrigger>,
    ) {
        let mut picked = Vec::new();
        for (i, coin) in self.collectibles.iter().enumerate() {
            if coin.is_in_range(avatar_pos) {
                picked.push(i);
            }
        }
        for &i in picked.iter().rev() {
            let coin = self.collectibles.remove(i);
            self.collected.insert(coin.def.id.clone());
            inventory.add_coin();
            triggers.push(InteractionTrigger::CoinCollected { id: coin.def.id });
        }
    }

    /// Trigger protocol for one hotspot. Returns None when the hotspot has
    /// nothing valid to do (malformed data is a level-authoring problem, not
    /// a runtime fault).
    fn fire(&mut self, index: usize, inventory: &Inventory) -> Option<InteractionTrigger> {
        let hotspot = &self.hotspots[index];
        match &hotspot.def.behavior {
            HotspotBehavior::Teleport { target } => {
                Some(InteractionTrigger::Teleport(target.clone()))
            }
            HotspotBehavior::Dialogue(effects) | HotspotBehavior::Item(effects) => {
                let gate_open = effects
                    .requires_item
                    .as_deref()
                    .is_some_and(|item| inventory.has_item(item));
                let (dialogue, used_alternate) =
                    match (&effects.alternate_dialogue, gate_open) {
                        (Some(alternate), true) => (alternate, true),
                        _ => match &effects.dialogue {
                            Some(primary) => (primary, false),
                            None => {
                                tracing::debug!(
                                    hotspot = %hotspot.def.id,
                                    "hotspot has no dialogue payload, ignoring trigger"
                                );
                                return None;
                            }
                        },
                    };

                let trigger = InteractionTrigger::Dialogue {
                    hotspot_id: hotspot.def.id.clone(),
                    dialogue: dialogue.clone(),
                    used_alternate,
                };
                self.pending = Some(PendingAction {
                    hotspot_id: self.hotspots[index].def.id.clone(),
                    used_alternate,
                });
                Some(trigger)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::level::{HotspotEffects, ItemDef, Point3};

    use super::*;

    fn origin_dialogue() -> DialogueDef {
        DialogueDef {
            lines: vec![crate::level::DialogueLine {
                speaker: "Pirate".into(),
                text: "Arr.".into(),
                audio: None,
                duration: 0.0,
            }],
        }
    }

    fn base_def(id: &str, behavior: HotspotBehavior) -> HotspotDef {
        HotspotDef {
            id: id.into(),
            name: None,
            position: Point3 { x: 0.0, y: 0.0, z: 0.0 },
            radius: 0.5,
            interaction_radius: 1.5,
            one_shot: false,
            victory: false,
            behavior,
        }
    }

    fn item(id: &str) -> ItemDef {
        ItemDef {
            id: id.into(),
            name: id.into(),
            description: None,
        }
    }

    /// Manager with the cooldown already elapsed
    fn warmed_manager(hotspots: &[HotspotDef]) -> HotspotManager {
        let mut manager = HotspotManager::new();
        manager.load(hotspots, &[]);
        let mut inv = Inventory::new();
        manager.update(2.0, Vec3::new(100.0, 0.0, 100.0), &mut inv);
        manager
    }

    const IN_RANGE: Vec3 = Vec3::new(0.5, 0.0, 0.5);
    const OUT_OF_RANGE: Vec3 = Vec3::new(50.0, 0.0, 50.0);
    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_cooldown_suppresses_triggers() {
        let def = base_def(
            "talker",
            HotspotBehavior::Dialogue(HotspotEffects {
                dialogue: Some(origin_dialogue()),
                ..Default::default()
            }),
        );
        let mut manager = HotspotManager::new();
        manager.load(&[def], &[]);
        let mut inv = Inventory::new();

        assert!(manager.update(0.5, IN_RANGE, &mut inv).is_empty());
        // Cooldown elapsed; next tick fires
        assert!(manager.update(0.6, IN_RANGE, &mut inv).is_empty());
        assert_eq!(manager.update(DT, IN_RANGE, &mut inv).len(), 1);
    }

    #[test]
    fn test_reentry_refires_after_leaving() {
        let def = base_def(
            "talker",
            HotspotBehavior::Dialogue(HotspotEffects {
                dialogue: Some(origin_dialogue()),
                ..Default::default()
            }),
        );
        let mut manager = warmed_manager(&[def]);
        let mut inv = Inventory::new();

        assert_eq!(manager.update(DT, IN_RANGE, &mut inv).len(), 1);
        manager.resolve_dialogue_end(&mut inv);

        // Still inside: no re-fire
        assert!(manager.update(DT, IN_RANGE, &mut inv).is_empty());

        // Leave, then re-enter: fires again
        manager.update(DT, OUT_OF_RANGE, &mut inv);
        assert_eq!(manager.update(DT, IN_RANGE, &mut inv).len(), 1);
    }

    #[test]
    fn test_pending_action_suppresses_other_triggers() {
        let talker = base_def(
            "talker",
            HotspotBehavior::Dialogue(HotspotEffects {
                dialogue: Some(origin_dialogue()),
                ..Default::default()
            }),
        );
        let mut other = base_def(
            "other",
            HotspotBehavior::Dialogue(HotspotEffects {
                dialogue: Some(origin_dialogue()),
                ..Default::default()
            }),
        );
        other.position = Point3 { x: 0.5, y: 0.0, z: 0.5 };
        // Only "talker" in range initially; walk into "other" while pending
        let mut manager = warmed_manager(&[talker, other.clone()]);
        let mut inv = Inventory::new();

        let triggers = manager.update(DT, Vec3::new(-1.0, 0.0, 0.0), &mut inv);
        assert_eq!(triggers.len(), 1);
        assert!(manager.has_pending_action());

        let triggers = manager.update(DT, IN_RANGE, &mut inv);
        assert!(triggers.is_empty());

        manager.resolve_dialogue_end(&mut inv);
        assert!(!manager.has_pending_action());
    }

    #[test]
    fn test_ungated_item_pickup_grants_once() {
        let def = base_def(
            "rum_barrel",
            HotspotBehavior::Item(HotspotEffects {
                dialogue: Some(origin_dialogue()),
                gives_item: Some(item("rum")),
                ..Default::default()
            }),
        );
        let mut manager = warmed_manager(&[def]);
        let mut inv = Inventory::new();

        manager.update(DT, IN_RANGE, &mut inv);
        manager.resolve_dialogue_end(&mut inv);
        assert!(inv.has_item("rum"));
        assert_eq!(inv.items().len(), 1);

        // Entry/exit cycles never produce a second copy
        manager.update(DT, OUT_OF_RANGE, &mut inv);
        manager.update(DT, IN_RANGE, &mut inv);
        manager.resolve_dialogue_end(&mut inv);
        assert_eq!(inv.items().len(), 1);
    }

    #[test]
    fn test_gate_selects_branch_and_applies_effects() {
        let def = HotspotDef {
            victory: true,
            ..base_def(
                "chest",
                HotspotBehavior::Dialogue(HotspotEffects {
                    dialogue: Some(origin_dialogue()),
                    alternate_dialogue: Some(origin_dialogue()),
                    requires_item: Some("key".into()),
                    consumes_item: Some("key".into()),
                    gives_item: Some(item("treasure")),
                    ..Default::default()
                }),
            )
        };
        let mut manager = warmed_manager(&[def.clone()]);
        let mut inv = Inventory::new();

        // Without the key: primary branch, no effects on resolution
        let triggers = manager.update(DT, IN_RANGE, &mut inv);
        assert!(matches!(
            &triggers[0],
            InteractionTrigger::Dialogue { used_alternate: false, .. }
        ));
        let outcomes = manager.resolve_dialogue_end(&mut inv);
        assert!(outcomes.is_empty());
        assert!(!inv.has_item("treasure"));

        // With the key: alternate branch consumes it, grants treasure, wins
        inv.add_item(item("key"));
        manager.update(DT, OUT_OF_RANGE, &mut inv);
        let triggers = manager.update(DT, IN_RANGE, &mut inv);
        assert!(matches!(
            &triggers[0],
            InteractionTrigger::Dialogue { used_alternate: true, .. }
        ));
        let outcomes = manager.resolve_dialogue_end(&mut inv);
        assert!(outcomes.contains(&ResolveOutcome::Victory));
        assert!(!inv.has_item("key"));
        assert!(inv.has_item("treasure"));
    }

    #[test]
    fn test_one_shot_removed_and_survives_reload() {
        let def = HotspotDef {
            one_shot: true,
            ..base_def(
                "talker",
                HotspotBehavior::Dialogue(HotspotEffects {
                    dialogue: Some(origin_dialogue()),
                    ..Default::default()
                }),
            )
        };
        let mut manager = warmed_manager(&[def.clone()]);
        let mut inv = Inventory::new();

        manager.update(DT, IN_RANGE, &mut inv);
        let outcomes = manager.resolve_dialogue_end(&mut inv);
        assert!(outcomes
            .iter()
            .any(|o| matches!(o, ResolveOutcome::HotspotRemoved { id } if id == "talker")));
        assert_eq!(manager.hotspots().count(), 0);

        // Re-entering fires nothing
        manager.update(DT, OUT_OF_RANGE, &mut inv);
        assert!(manager.update(DT, IN_RANGE, &mut inv).is_empty());

        // Reloading the same level keeps it removed
        manager.load(&[def], &[]);
        assert_eq!(manager.hotspots().count(), 0);
    }

    #[test]
    fn test_teleport_fires_immediately_without_pending() {
        let def = base_def(
            "cave",
            HotspotBehavior::Teleport {
                target: TeleportTarget {
                    level_id: "level_02".into(),
                    spawn_id: "entrance".into(),
                },
            },
        );
        let mut manager = warmed_manager(&[def]);
        let mut inv = Inventory::new();

        let triggers = manager.update(DT, IN_RANGE, &mut inv);
        assert!(matches!(&triggers[0], InteractionTrigger::Teleport(t) if t.level_id == "level_02"));
        assert!(!manager.has_pending_action());
    }

    #[test]
    fn test_missing_dialogue_payload_is_noop() {
        let def = base_def("broken", HotspotBehavior::Dialogue(HotspotEffects::default()));
        let mut manager = warmed_manager(&[def]);
        let mut inv = Inventory::new();

        assert!(manager.update(DT, IN_RANGE, &mut inv).is_empty());
        assert!(!manager.has_pending_action());
    }

    #[test]
    fn test_coins_collected_once_per_session() {
        let coin = CollectibleDef {
            id: "coin_1".into(),
            position: Point3 { x: 0.0, y: 0.0, z: 0.0 },
            radius: 0.6,
        };
        let mut manager = HotspotManager::new();
        manager.load(&[], &[coin.clone()]);
        let mut inv = Inventory::new();

        // Cooldown does not gate coin pickup
        let triggers = manager.update(DT, Vec3::new(0.2, 0.0, 0.2), &mut inv);
        assert!(matches!(&triggers[0], InteractionTrigger::CoinCollected { id } if id == "coin_1"));
        assert_eq!(inv.coin_count(), 1);

        // Collected ids survive a level reload
        manager.load(&[], &[coin]);
        assert_eq!(manager.collectibles().count(), 0);
        assert!(manager.update(DT, Vec3::new(0.2, 0.0, 0.2), &mut inv).is_empty());
        assert_eq!(inv.coin_count(), 1);
    }
}
