// Character stats - motion, attack timing and body size
// All timings are in ticks, all distances in world units per tick

use serde::{Deserialize, Serialize};

/// Tunable character properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    // Movement
    /// Forward scroll speed while walking (units/tick)
    pub walk_speed: f32,
    /// Initial upward velocity of a jump (units/tick)
    pub jump_velocity: f32,
    /// Velocity lost per tick while airborne
    pub gravity: f32,

    // Attack
    /// Length of an attack in ticks
    pub attack_duration: u32,
    /// Ticks after an attack before the next one may start
    pub attack_cooldown: u32,

    // Limb animation
    /// Walk cycle phase advance per tick while walking (radians)
    pub walk_cycle_speed: f32,
    /// Per-tick decay factor of the walk cycle once walking stops
    pub walk_cycle_decay: f32,
    /// Peak leg swing (degrees)
    pub swing_amplitude_deg: f32,

    // Combat
    /// Base health points
    pub max_health: u32,

    // Dimensions (body collision volume)
    pub width: f32,
    pub height: f32,
}

/// Stats used unless a config file overrides them
pub const BASE_STATS: CharacterStats = CharacterStats {
    walk_speed: 4.0,
    jump_velocity: 12.0,
    gravity: 0.75,

    attack_duration: 40,
    attack_cooldown: 120,

    walk_cycle_speed: 0.2,
    walk_cycle_decay: 0.8,
    swing_amplitude_deg: 30.0,

    max_health: 5,

    width: 40.0,
    height: 80.0,
};

impl Default for CharacterStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl CharacterStats {
    /// Ticks from take-off to the top of the arc
    pub fn ticks_to_peak(&self) -> u32 {
        (self.jump_velocity / self.gravity).ceil() as u32
    }

    /// Radius of the body when treated as a circle (pickups)
    pub fn body_radius(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = CharacterStats::default();
        assert_eq!(stats.attack_duration, 40);
        assert_eq!(stats.attack_cooldown, 120);
        assert_eq!(stats.swing_amplitude_deg, 30.0);
        assert_eq!(stats.max_health, 5);
    }

    #[test]
    fn test_ticks_to_peak() {
        assert_eq!(BASE_STATS.ticks_to_peak(), 16);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let stats: CharacterStats = serde_json::from_str(r#"{"walk_speed": 6.0}"#).unwrap();
        assert_eq!(stats.walk_speed, 6.0);
        assert_eq!(stats.attack_duration, BASE_STATS.attack_duration);
    }
}
