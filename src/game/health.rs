// Player health, invulnerability and checkpoints

use crate::game::config::HealthConfig;
use crate::game::events::{GameBus, GameEvent};

/// Health snapshot
///
/// After every mutation `0 <= current <= max` and `is_alive == (current > 0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthState {
    pub current: u32,
    pub max: u32,
    pub is_alive: bool,
    /// World offset restarts fall back to
    pub last_checkpoint: f32,
}

/// Owns the player's health and checkpoint watermark
#[derive(Debug)]
pub struct HealthManager {
    state: HealthState,
    invulnerable_ticks: u32,
    invulnerability_duration: u32,
    checkpoint_interval: f32,
    /// Set once game over has been announced for the current life
    game_over_emitted: bool,
}

impl HealthManager {
    pub fn new(max_health: u32, config: &HealthConfig) -> Self {
        let max = max_health.max(1);
        Self {
            state: HealthState {
                current: max,
                max,
                is_alive: true,
                last_checkpoint: 0.0,
            },
            invulnerable_ticks: 0,
            invulnerability_duration: config.invulnerability_ticks,
            checkpoint_interval: config.checkpoint_interval.max(f32::EPSILON),
            game_over_emitted: false,
        }
    }

    pub fn state(&self) -> &HealthState {
        &self.state
    }

    pub fn current(&self) -> u32 {
        self.state.current
    }

    pub fn max(&self) -> u32 {
        self.state.max
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive
    }

    pub fn last_checkpoint(&self) -> f32 {
        self.state.last_checkpoint
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    /// Apply damage unless dead or invulnerable. Returns true if health changed.
    ///
    /// Reaching zero announces game over, once per life.
    pub fn take_damage(&mut self, amount: u32, bus: &mut GameBus) -> bool {
        if !self.state.is_alive || self.is_invulnerable() || amount == 0 {
            return false;
        }

        let before = self.state.current;
        self.state.current = before.saturating_sub(amount);
        self.state.is_alive = self.state.current > 0;
        self.invulnerable_ticks = self.invulnerability_duration;

        bus.publish(GameEvent::HealthChange {
            current: self.state.current,
            max: self.state.max,
            delta: i64::from(self.state.current) - i64::from(before),
        });

        if !self.state.is_alive && !self.game_over_emitted {
            self.game_over_emitted = true;
            log::info!(
                "Player died, last checkpoint {:.0}",
                self.state.last_checkpoint
            );
            bus.publish(GameEvent::GameOver {
                checkpoint: self.state.last_checkpoint,
            });
        }
        true
    }

    /// Restore health up to max. Returns true if health changed.
    pub fn heal(&mut self, amount: u32, bus: &mut GameBus) -> bool {
        if !self.state.is_alive || amount == 0 || self.state.current == self.state.max {
            return false;
        }

        let before = self.state.current;
        self.state.current = before.saturating_add(amount).min(self.state.max);
        bus.publish(GameEvent::HealthChange {
            current: self.state.current,
            max: self.state.max,
            delta: i64::from(self.state.current) - i64::from(before),
        });
        true
    }

    /// Count the invulnerability window down by one tick
    pub fn tick(&mut self) {
        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);
    }

    /// Advance the checkpoint when `offset` crosses a new interval boundary
    ///
    /// Returns the new checkpoint so the caller can persist and announce it.
    pub fn on_world_progress(&mut self, offset: f32) -> Option<f32> {
        if !self.state.is_alive || !offset.is_finite() {
            return None;
        }
        let boundary = (offset / self.checkpoint_interval).floor() * self.checkpoint_interval;
        if boundary > self.state.last_checkpoint {
            self.state.last_checkpoint = boundary;
            Some(boundary)
        } else {
            None
        }
    }

    /// Full health for a new life; the checkpoint is kept
    pub fn restore(&mut self) {
        self.state.current = self.state.max;
        self.state.is_alive = true;
        self.invulnerable_ticks = 0;
        self.game_over_emitted = false;
    }

    /// Resume from saved values; a saved death becomes a fresh life
    pub fn resume(&mut self, health: u32, checkpoint: f32) {
        self.state.current = if health == 0 {
            self.state.max
        } else {
            health.min(self.state.max)
        };
        self.state.is_alive = true;
        self.state.last_checkpoint = checkpoint.max(0.0);
        self.invulnerable_ticks = 0;
        self.game_over_emitted = false;
    }
}
