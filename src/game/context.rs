// Simulation context: everything one session simulates
//
// Passed explicitly to whatever needs cross-component reads instead of
// components finding each other through shared globals.

use glam::Vec2;

use super::characters::Character;
use super::config::GameConfig;
use super::entities::{CollectibleManager, EnemyManager, Wallet};
use super::health::HealthManager;

pub struct SimulationContext {
    pub player: Character,
    pub health: HealthManager,
    pub enemies: EnemyManager,
    pub collectibles: CollectibleManager,
    pub wallet: Wallet,
    /// Distance the world has scrolled; the player stands at
    /// `world_offset + player_screen_x`
    world_offset: f32,
    player_screen_x: f32,
    ground_y: f32,
}

impl SimulationContext {
    pub fn new(config: &GameConfig) -> Self {
        let world = &config.world;
        Self {
            player: Character::new(
                "player",
                config.character.clone(),
                Vec2::new(world.player_screen_x, world.ground_y),
            ),
            health: HealthManager::new(config.character.max_health, &config.health),
            enemies: EnemyManager::new(&config.spawn, world.ground_y, 0.0),
            collectibles: CollectibleManager::new(&config.spawn, world.ground_y, 0.0),
            wallet: Wallet::default(),
            world_offset: 0.0,
            player_screen_x: world.player_screen_x,
            ground_y: world.ground_y,
        }
    }

    pub fn world_offset(&self) -> f32 {
        self.world_offset
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    /// Scroll the world forward, carrying the player along
    pub fn advance_world(&mut self, delta: f32) {
        self.world_offset += delta;
        self.player
            .set_world_x(self.world_offset + self.player_screen_x);
    }

    /// Jump the world to `offset`: player back on the ground, entities cleared
    pub fn reset_world(&mut self, offset: f32) {
        self.world_offset = offset;
        self.player.reset_for_restart(Vec2::new(
            offset + self.player_screen_x,
            self.ground_y,
        ));
        self.enemies.reset(offset);
        self.collectibles.reset(offset);
    }
}
