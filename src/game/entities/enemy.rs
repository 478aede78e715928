// Enemies: kinds, lifecycle and the manager that owns them

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::core::Rect;
use crate::game::config::SpawnConfig;
use crate::game::events::{GameBus, GameEvent};

/// Unique enemy identifier within a session
pub type EnemyId = u32;

/// Enemy type; decides toughness, damage, speed and size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Slime,
    Bat,
    Golem,
}

impl EnemyKind {
    /// Hits needed to defeat
    pub fn hit_points(&self) -> u32 {
        match self {
            Self::Slime | Self::Bat => 1,
            Self::Golem => 2,
        }
    }

    /// Damage dealt when touching the player
    pub fn contact_damage(&self) -> u32 {
        match self {
            Self::Slime | Self::Bat => 1,
            Self::Golem => 2,
        }
    }

    /// Walking speed toward the player (units/tick, toward -x)
    pub fn speed(&self) -> f32 {
        match self {
            Self::Slime => 0.5,
            Self::Bat => 1.2,
            Self::Golem => 0.3,
        }
    }

    /// Body size (width, height)
    pub fn size(&self) -> Vec2 {
        match self {
            Self::Slime => Vec2::new(36.0, 24.0),
            Self::Bat => Vec2::new(30.0, 20.0),
            Self::Golem => Vec2::new(50.0, 70.0),
        }
    }

    /// Height of the feet above the ground line
    pub fn altitude(&self) -> f32 {
        match self {
            Self::Bat => 40.0,
            _ => 0.0,
        }
    }

    fn pick(rng: &mut StdRng) -> Self {
        let roll: f64 = rng.gen();
        if roll < 0.5 {
            Self::Slime
        } else if roll < 0.8 {
            Self::Bat
        } else {
            Self::Golem
        }
    }
}

/// Where an enemy is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyLifecycle {
    Active,
    /// Playing the defeat animation; removed when it runs out
    Defeated { ticks_remaining: u32 },
}

/// A single enemy. Only `EnemyManager` mutates it.
#[derive(Debug, Clone)]
pub struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    /// Point between the feet, world coordinates
    position: Vec2,
    hit_points: u32,
    lifecycle: EnemyLifecycle,
}

impl Enemy {
    pub fn id(&self) -> EnemyId {
        self.id
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn hit_points(&self) -> u32 {
        self.hit_points
    }

    pub fn lifecycle(&self) -> EnemyLifecycle {
        self.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == EnemyLifecycle::Active
    }

    /// Body volume used for both attack hits and player contact
    pub fn rect(&self) -> Rect {
        let size = self.kind.size();
        Rect::new(
            self.position.x - size.x / 2.0,
            self.position.y - size.y,
            size.x,
            size.y,
        )
    }
}

/// Outcome of landing one hit on an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyHitResult {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub position: Vec2,
    pub hit_points_left: u32,
    pub defeated: bool,
}

/// Owns every enemy in the world
#[derive(Debug)]
pub struct EnemyManager {
    enemies: Vec<Enemy>,
    next_id: EnemyId,
    /// World x at which the next enemy appears
    next_spawn_x: f32,
    rng: StdRng,
    spacing: (f32, f32),
    spawn_ahead: f32,
    ground_y: f32,
    defeat_ticks: u32,
}

impl EnemyManager {
    pub fn new(config: &SpawnConfig, ground_y: f32, start_offset: f32) -> Self {
        Self {
            enemies: Vec::new(),
            next_id: 1,
            next_spawn_x: start_offset + config.spawn_ahead,
            rng: StdRng::seed_from_u64(config.seed),
            spacing: config.enemy_spacing,
            spawn_ahead: config.spawn_ahead,
            ground_y,
            defeat_ticks: config.defeat_animation_ticks,
        }
    }

    /// Place an enemy of `kind` standing on the ground at world `x`
    pub fn spawn_at(&mut self, kind: EnemyKind, x: f32, bus: &mut GameBus) -> EnemyId {
        let id = self.next_id;
        self.next_id += 1;
        let position = Vec2::new(x, self.ground_y - kind.altitude());
        self.enemies.push(Enemy {
            id,
            kind,
            position,
            hit_points: kind.hit_points(),
            lifecycle: EnemyLifecycle::Active,
        });
        log::debug!("Spawned {:?} #{} at x={:.0}", kind, id, x);
        bus.publish(GameEvent::EnemySpawn {
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
            let kind = EnemyKind::pick(&mut self.rng);
            let x = self.next_spawn_x;
            self.spawn_at(kind, x, bus);
            self.next_spawn_x += self.rng.gen_range(self.spacing.0..=self.spacing.1);
            spawned += 1;
        }
        spawned
    }

    /// Advance movement and defeat animations, then drop finished enemies
    /// and those more than `margin` behind `world_offset`
    pub fn update(&mut self, world_offset: f32, margin: f32) {
        for enemy in &mut self.enemies {
            match &mut enemy.lifecycle {
                EnemyLifecycle::Active => enemy.position.x -= enemy.kind.speed(),
                EnemyLifecycle::Defeated { ticks_remaining } => {
                    *ticks_remaining = ticks_remaining.saturating_sub(1);
                }
            }
        }

        let cutoff = world_offset - margin;
        self.enemies.retain(|e| {
            let finished = matches!(e.lifecycle, EnemyLifecycle::Defeated { ticks_remaining: 0 });
            !finished && e.rect().right() >= cutoff
        });
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Every enemy, including those in their defeat animation
    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    /// Enemies that can still hit and be hit
    pub fn active(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_active())
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Land one hit. Returns `None` if the enemy is gone or already defeated.
    pub fn hit(&mut self, id: EnemyId) -> Option<EnemyHitResult> {
        let defeat_ticks = self.defeat_ticks;
        let enemy = self
            .enemies
            .iter_mut()
            .find(|e| e.id == id && e.is_active())?;

        enemy.hit_points = enemy.hit_points.saturating_sub(1);
        let defeated = enemy.hit_points == 0;
        if defeated {
            enemy.lifecycle = EnemyLifecycle::Defeated {
                ticks_remaining: defeat_ticks,
            };
        }

        Some(EnemyHitResult {
            id,
            kind: enemy.kind,
            position: enemy.position,
            hit_points_left: enemy.hit_points,
            defeated,
        })
    }

    /// Shove an active enemy `distance` units further along +x
    pub fn push_back(&mut self, id: EnemyId, distance: f32) -> bool {
        match self.enemies.iter_mut().find(|e| e.id == id && e.is_active()) {
            Some(enemy) => {
                enemy.position.x += distance;
                true
            }
            None => false,
        }
    }

    /// Remove every enemy and restart the spawn cadence from `offset`
    pub fn reset(&mut self, offset: f32) {
        self.enemies.clear();
        self.next_spawn_x = offset + self.spawn_ahead;
    }
}
