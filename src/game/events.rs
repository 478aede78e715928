// Game event taxonomy
//
// One payload variant per event type so subscribers can match
// exhaustively instead of probing optional fields.

use serde::Serialize;

use crate::engine::events::{BusEvent, EventBus};

use super::entities::{CollectibleId, CollectibleKind, EnemyId, EnemyKind};

/// Namespaces every built-in event name belongs to
pub const NAMESPACES: &[&str] = &["character.", "game.", "collectible.", "enemy."];

/// The bus type used by a game session
pub type GameBus = EventBus<GameEvent>;

/// Create a bus that knows the game taxonomy
pub fn game_bus(history_len: usize) -> GameBus {
    EventBus::with_namespaces(history_len, NAMESPACES)
}

/// Discriminant of a `GameEvent`, used for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MoveStart,
    MoveStop,
    JumpStart,
    JumpPeak,
    JumpEnd,
    AttackStart,
    AttackHit,
    AttackEnd,
    CooldownStart,
    CooldownUpdate,
    CooldownEnd,
    HealthChange,
    PositionChange,
    WorldUpdate,
    Checkpoint,
    GameOver,
    Restart,
    RestartComplete,
    CollectibleSpawn,
    CollectibleCollect,
    CollectibleCountUpdate,
    EnemySpawn,
    EnemyHit,
    EnemyDefeated,
    Custom,
}

impl EventKind {
    /// Dotted event name for built-in kinds
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MoveStart => "character.move_start",
            Self::MoveStop => "character.move_stop",
            Self::JumpStart => "character.jump_start",
            Self::JumpPeak => "character.jump_peak",
            Self::JumpEnd => "character.jump_end",
            Self::AttackStart => "character.attack_start",
            Self::AttackHit => "character.attack_hit",
            Self::AttackEnd => "character.attack_end",
            Self::CooldownStart => "character.cooldown_start",
            Self::CooldownUpdate => "character.cooldown_update",
            Self::CooldownEnd => "character.cooldown_end",
            Self::HealthChange => "character.health_change",
            Self::PositionChange => "character.position_change",
            Self::WorldUpdate => "game.world_update",
            Self::Checkpoint => "game.checkpoint",
            Self::GameOver => "game.game_over",
            Self::Restart => "game.restart",
            Self::RestartComplete => "game.restart_complete",
            Self::CollectibleSpawn => "collectible.spawn",
            Self::CollectibleCollect => "collectible.collect",
            Self::CollectibleCountUpdate => "collectible.count_update",
            Self::EnemySpawn => "enemy.spawn",
            Self::EnemyHit => "enemy.hit",
            Self::EnemyDefeated => "enemy.defeated",
            Self::Custom => "custom",
        }
    }
}

/// Everything the simulation announces
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GameEvent {
    MoveStart,
    MoveStop,
    JumpStart { y: f32, velocity: f32 },
    JumpPeak { y: f32 },
    JumpEnd { y: f32 },
    AttackStart { serial: u64 },
    AttackHit { x: f32, y: f32, enemy_kind: EnemyKind },
    AttackEnd { serial: u64 },
    CooldownStart { ticks: u32 },
    CooldownUpdate { remaining: u32, total: u32 },
    CooldownEnd,
    HealthChange { current: u32, max: u32, delta: i64 },
    PositionChange { x: f32, y: f32 },
    WorldUpdate { offset: f32, delta: f32 },
    Checkpoint { checkpoint: f32 },
    GameOver { checkpoint: f32 },
    Restart { checkpoint: f32 },
    RestartComplete { offset: f32 },
    CollectibleSpawn { id: CollectibleId, x: f32, y: f32, kind: CollectibleKind },
    CollectibleCollect { id: CollectibleId, x: f32, y: f32, value: u32 },
    CollectibleCountUpdate { total: u64 },
    EnemySpawn { id: EnemyId, x: f32, y: f32, kind: EnemyKind },
    EnemyHit { id: EnemyId, x: f32, y: f32, kind: EnemyKind, hit_points: u32 },
    EnemyDefeated { id: EnemyId, x: f32, y: f32, kind: EnemyKind },
    /// Extension events from collaborators outside the core (shop, UI)
    Custom { name: String, data: serde_json::Value },
}

impl GameEvent {
    /// Build an extension event
    pub fn custom(name: impl Into<String>, data: serde_json::Value) -> Self {
        Self::Custom {
            name: name.into(),
            data,
        }
    }
}

impl BusEvent for GameEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            Self::MoveStart => EventKind::MoveStart,
            Self::MoveStop => EventKind::MoveStop,
            Self::JumpStart { .. } => EventKind::JumpStart,
            Self::JumpPeak { .. } => EventKind::JumpPeak,
            Self::JumpEnd { .. } => EventKind::JumpEnd,
            Self::AttackStart { .. } => EventKind::AttackStart,
            Self::AttackHit { .. } => EventKind::AttackHit,
            Self::AttackEnd { .. } => EventKind::AttackEnd,
            Self::CooldownStart { .. } => EventKind::CooldownStart,
            Self::CooldownUpdate { .. } => EventKind::CooldownUpdate,
            Self::CooldownEnd => EventKind::CooldownEnd,
            Self::HealthChange { .. } => EventKind::HealthChange,
            Self::PositionChange { .. } => EventKind::PositionChange,
            Self::WorldUpdate { .. } => EventKind::WorldUpdate,
            Self::Checkpoint { .. } => EventKind::Checkpoint,
            Self::GameOver { .. } => EventKind::GameOver,
            Self::Restart { .. } => EventKind::Restart,
            Self::RestartComplete { .. } => EventKind::RestartComplete,
            Self::CollectibleSpawn { .. } => EventKind::CollectibleSpawn,
            Self::CollectibleCollect { .. } => EventKind::CollectibleCollect,
            Self::CollectibleCountUpdate { .. } => EventKind::CollectibleCountUpdate,
            Self::EnemySpawn { .. } => EventKind::EnemySpawn,
            Self::EnemyHit { .. } => EventKind::EnemyHit,
            Self::EnemyDefeated { .. } => EventKind::EnemyDefeated,
            Self::Custom { .. } => EventKind::Custom,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Custom { name, .. } => name,
            other => other.kind().as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_builtin_names_are_namespaced() {
        let events = [
            GameEvent::MoveStart,
            GameEvent::JumpPeak { y: 0.0 },
            GameEvent::GameOver { checkpoint: 0.0 },
            GameEvent::CollectibleCountUpdate { total: 1 },
            GameEvent::EnemyDefeated {
                id: 1,
                x: 0.0,
                y: 0.0,
                kind: EnemyKind::Slime,
            },
        ];
        for event in &events {
            assert!(
                NAMESPACES.iter().any(|ns| event.name().starts_with(ns)),
                "{} is not namespaced",
                event.name()
            );
        }
    }

    #[test]
    fn test_custom_event_uses_its_own_name() {
        let event = GameEvent::custom("shop.purchase", serde_json::json!({ "item": "cape" }));
        assert_eq!(event.kind(), EventKind::Custom);
        assert_eq!(event.name(), "shop.purchase");
    }

    #[test]
    fn test_game_bus_dispatches_by_kind() {
        let mut bus = game_bus(8);
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        bus.subscribe(EventKind::EnemyHit, move |event, _| {
            if let GameEvent::EnemyHit { hit_points, .. } = event.payload {
                counter.set(counter.get() + hit_points);
            }
            Ok(())
        });

        bus.publish(GameEvent::EnemyHit {
            id: 3,
            x: 1.0,
            y: 2.0,
            kind: EnemyKind::Golem,
            hit_points: 2,
        });
        bus.publish(GameEvent::MoveStart);

        assert_eq!(hits.get(), 2);
        assert_eq!(bus.history().len(), 2);
    }

    #[test]
    fn test_history_export_uses_dotted_names() {
        let mut bus = game_bus(8);
        bus.set_clock(5);
        bus.publish(GameEvent::CollectibleCountUpdate { total: 3 });
        let json = bus.history().to_json().unwrap();
        assert_eq!(
            json,
            r#"[{"type":"collectible.count_update","payload":{"total":3},"timestamp":5}]"#
        );
    }
}
