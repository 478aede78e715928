// Collectibles: flowers lying along the path

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::game::config::SpawnConfig;
use crate::game::events::{GameBus, GameEvent};

/// Unique collectible identifier within a session
pub type CollectibleId = u32;

/// How high above the ground collectibles float (center point)
const FLOAT_HEIGHT: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleKind {
    Flower,
    GoldenFlower,
}

impl CollectibleKind {
    /// Currency added when collected
    pub fn value(&self) -> u32 {
        match self {
            Self::Flower => 1,
            Self::GoldenFlower => 5,
        }
    }

    /// Pickup radius
    pub fn radius(&self) -> f32 {
        match self {
            Self::Flower => 12.0,
            Self::GoldenFlower => 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleLifecycle {
    Active,
    /// Playing the pickup animation; removed when it runs out
    Collected { ticks_remaining: u32 },
}

/// A single collectible. Only `CollectibleManager` mutates it.
#[derive(Debug, Clone)]
pub struct Collectible {
    id: CollectibleId,
    kind: CollectibleKind,
    /// Center point, world coordinates
    position: Vec2,
    lifecycle: CollectibleLifecycle,
}

impl Collectible {
    pub fn id(&self) -> CollectibleId {
        self.id
    }

    pub fn kind(&self) -> CollectibleKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.kind.radius()
    }

    pub fn lifecycle(&self) -> CollectibleLifecycle {
        self.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == CollectibleLifecycle::Active
    }
}

/// Owns every collectible in the world
#[derive(Debug)]
pub struct CollectibleManager {
    items: Vec<Collectible>,
    next_id: CollectibleId,
    next_spawn_x: f32,
    rng: StdRng,
    spacing: (f32, f32),
    spawn_ahead: f32,
    golden_chance: f64,
    ground_y: f32,
    collect_ticks: u32,
}

impl CollectibleManager {
    pub fn new(config: &SpawnConfig, ground_y: f32, start_offset: f32) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            next_spawn_x: start_offset + config.spawn_ahead,
            // Separate stream from the enemy spawner
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(1)),
            spacing: config.collectible_spacing,
            spawn_ahead: config.spawn_ahead,
            golden_chance: config.golden_chance.clamp(0.0, 1.0),
            ground_y,
            collect_ticks: config.collect_animation_ticks,
        }
    }

    /// Place a collectible of `kind` floating above the ground at world `x`
    pub fn spawn_at(&mut self, kind: CollectibleKind, x: f32, bus: &mut GameBus) -> CollectibleId {
        let id = self.next_id;
        self.next_id += 1;
        let position = Vec2::new(x, self.ground_y - FLOAT_HEIGHT);
        self.items.push(Collectible {
            id,
            kind,
            position,
            lifecycle: CollectibleLifecycle::Active,
        });
        bus.publish(GameEvent::CollectibleSpawn {
            id,
            x: position.x,
            y: position.y,
            kind,
        });
        id
    }

    /// Spawn whatever the cadence calls for up to `offset + spawn_ahead`
    pub fn maybe_spawn(&mut self, offset: f32, bus: &mut GameBus) -> usize {
        let mut spawned = 0;
        while self.next_spawn_x <= offset + self.spawn_ahead {
            let kind = if self.rng.gen_bool(self.golden_chance) {
                CollectibleKind::GoldenFlower
            } else {
                CollectibleKind::Flower
            };
            let x = self.next_spawn_x;
            self.spawn_at(kind, x, bus);
            self.next_spawn_x += self.rng.gen_range(self.spacing.0..=self.spacing.1);
            spawned += 1;
        }
        spawned
    }

    /// Advance pickup animations and drop finished or left-behind items
    pub fn update(&mut self, world_offset: f32, margin: f32) {
        for item in &mut self.items {
            if let CollectibleLifecycle::Collected { ticks_remaining } = &mut item.lifecycle {
                *ticks_remaining = ticks_remaining.saturating_sub(1);
            }
        }

        let cutoff = world_offset - margin;
        self.items.retain(|c| {
            let finished = matches!(
                c.lifecycle,
                CollectibleLifecycle::Collected { ticks_remaining: 0 }
            );
            !finished && c.position.x + c.radius() >= cutoff
        });
    }

    pub fn get(&self, id: CollectibleId) -> Option<&Collectible> {
        self.items.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collectible> {
        self.items.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &Collectible> {
        self.items.iter().filter(|c| c.is_active())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mark an item collected and return its value
    ///
    /// Returns `None` for unknown or already collected items.
    pub fn collect(&mut self, id: CollectibleId) -> Option<u32> {
        let item = self.items.iter_mut().find(|c| c.id == id && c.is_active())?;
        item.lifecycle = CollectibleLifecycle::Collected {
            ticks_remaining: self.collect_ticks,
        };
        Some(item.kind.value())
    }

    /// Remove every item and restart the spawn cadence from `offset`
    pub fn reset(&mut self, offset: f32) {
        self.items.clear();
        self.next_spawn_x = offset + self.spawn_ahead;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::DEFAULT_SPAWN;
    use crate::game::events::game_bus;

    fn manager() -> CollectibleManager {
        CollectibleManager::new(&DEFAULT_SPAWN, 400.0, 0.0)
    }

    #[test]
    fn test_collect_returns_value_once() {
        let mut items = manager();
        let mut bus = game_bus(0);
        let flower = items.spawn_at(CollectibleKind::Flower, 200.0, &mut bus);
        let golden = items.spawn_at(CollectibleKind::GoldenFlower, 260.0, &mut bus);

        assert_eq!(items.collect(flower), Some(1));
        assert_eq!(items.collect(flower), None);
        assert_eq!(items.collect(golden), Some(5));
        assert_eq!(items.active().count(), 0);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_collected_item_removed_after_animation() {
        let mut items = manager();
        let mut bus = game_bus(0);
        let id = items.spawn_at(CollectibleKind::Flower, 200.0, &mut bus);
        items.collect(id);
        for _ in 0..DEFAULT_SPAWN.collect_animation_ticks {
            items.update(0.0, 300.0);
        }
        assert!(items.get(id).is_none());
    }

    #[test]
    fn test_items_float_above_ground() {
        let mut items = manager();
        let mut bus = game_bus(0);
        let id = items.spawn_at(CollectibleKind::Flower, 200.0, &mut bus);
        assert_eq!(items.get(id).unwrap().position(), Vec2::new(200.0, 370.0));
    }

    #[test]
    fn test_cadence_and_despawn() {
        let mut items = manager();
        let mut bus = game_bus(0);
        let spawned = items.maybe_spawn(1000.0, &mut bus);
        assert!(spawned >= 3);
        assert!(items.iter().all(|c| c.position().x >= 900.0));

        items.update(5000.0, 300.0);
        assert!(items.is_empty());
    }

    #[test]
    fn test_reset_clears_items() {
        let mut items = manager();
        let mut bus = game_bus(0);
        items.maybe_spawn(0.0, &mut bus);
        items.reset(500.0);
        assert!(items.is_empty());
        assert_eq!(items.maybe_spawn(0.0, &mut bus), 0);
        assert_eq!(items.maybe_spawn(500.0, &mut bus), 1);
    }
}
