// Game configuration
//
// Every tunable has a compiled-in default; a JSON file may override any
// subset of them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::characters::CharacterStats;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Hit detection tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Attack progress at which the hitbox appears
    pub active_start: f32,
    /// Attack progress after which the hitbox is gone
    pub active_end: f32,
    /// Tolerance added around the attack hitbox
    pub hit_padding: f32,
    /// Attack hitbox width (weapon reach)
    pub reach: f32,
    /// Attack hitbox height
    pub hitbox_height: f32,
    /// Extra forward reach at the peak of the lunge
    pub lunge_distance: f32,
    /// How far an enemy is shoved after touching the player
    pub contact_pushback: f32,
    /// Radius multiplier for distance-based pickups
    pub collect_radius_multiplier: f32,
}

pub const DEFAULT_COMBAT: CombatConfig = CombatConfig {
    active_start: 0.2,
    active_end: 0.7,
    hit_padding: 5.0,
    reach: 60.0,
    hitbox_height: 50.0,
    lunge_distance: 20.0,
    contact_pushback: 60.0,
    collect_radius_multiplier: 1.5,
};

impl Default for CombatConfig {
    fn default() -> Self {
        DEFAULT_COMBAT
    }
}

/// Health and checkpoint tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Ticks of invulnerability after taking damage
    pub invulnerability_ticks: u32,
    /// World distance between checkpoints
    pub checkpoint_interval: f32,
}

pub const DEFAULT_HEALTH: HealthConfig = HealthConfig {
    invulnerability_ticks: 60,
    checkpoint_interval: 500.0,
};

impl Default for HealthConfig {
    fn default() -> Self {
        DEFAULT_HEALTH
    }
}

/// World layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Y of the ground line (feet of a standing character)
    pub ground_y: f32,
    /// Player's fixed horizontal screen position; world x = offset + this
    pub player_screen_x: f32,
    /// How far behind the world offset entities are dropped
    pub despawn_margin: f32,
    /// Ticks between a restart and motion being re-enabled
    pub restart_settle_ticks: u32,
}

pub const DEFAULT_WORLD: WorldConfig = WorldConfig {
    ground_y: 400.0,
    player_screen_x: 150.0,
    despawn_margin: 300.0,
    restart_settle_ticks: 6,
};

impl Default for WorldConfig {
    fn default() -> Self {
        DEFAULT_WORLD
    }
}

/// Entity spawn cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// RNG seed, so runs are reproducible
    pub seed: u64,
    /// Spawn this far ahead of the world offset
    pub spawn_ahead: f32,
    /// Distance range between consecutive enemies
    pub enemy_spacing: (f32, f32),
    /// Distance range between consecutive collectibles
    pub collectible_spacing: (f32, f32),
    /// Chance that a collectible is a golden flower
    pub golden_chance: f64,
    /// Ticks an enemy lingers in its defeat animation
    pub defeat_animation_ticks: u32,
    /// Ticks a collectible lingers in its collect animation
    pub collect_animation_ticks: u32,
}

pub const DEFAULT_SPAWN: SpawnConfig = SpawnConfig {
    seed: 0x5eed,
    spawn_ahead: 900.0,
    enemy_spacing: (350.0, 700.0),
    collectible_spacing: (150.0, 400.0),
    golden_chance: 0.15,
    defeat_animation_ticks: 20,
    collect_animation_ticks: 15,
};

impl Default for SpawnConfig {
    fn default() -> Self {
        DEFAULT_SPAWN
    }
}

/// Event bus options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Length of the diagnostic history ring (0 disables it)
    pub history_len: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { history_len: 256 }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub character: CharacterStats,
    pub combat: CombatConfig,
    pub health: HealthConfig,
    pub world: WorldConfig,
    pub spawn: SpawnConfig,
    pub events: EventsConfig,
}

impl GameConfig {
    /// Load and validate a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.character;
        if c.attack_duration == 0 {
            return Err(ConfigError::Invalid("attack_duration must be > 0".into()));
        }
        if !(c.gravity > 0.0 && c.jump_velocity > 0.0) {
            return Err(ConfigError::Invalid(
                "gravity and jump_velocity must be > 0".into(),
            ));
        }
        if c.max_health == 0 {
            return Err(ConfigError::Invalid("max_health must be > 0".into()));
        }
        let combat = &self.combat;
        if !(0.0..=1.0).contains(&combat.active_start)
            || !(0.0..=1.0).contains(&combat.active_end)
            || combat.active_start > combat.active_end
        {
            return Err(ConfigError::Invalid(
                "active window must satisfy 0 <= start <= end <= 1".into(),
            ));
        }
        if !(self.health.checkpoint_interval > 0.0) {
            return Err(ConfigError::Invalid("checkpoint_interval must be > 0".into()));
        }
        for (name, (min, max)) in [
            ("enemy_spacing", self.spawn.enemy_spacing),
            ("collectible_spacing", self.spawn.collectible_spacing),
        ] {
            if !(min > 0.0 && min <= max && max.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must satisfy 0 < min <= max"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.spawn.golden_chance) {
            return Err(ConfigError::Invalid("golden_chance must be in [0, 1]".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "health": {{ "invulnerability_ticks": 10 }}, "events": {{ "history_len": 0 }} }}"#
        )
        .unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.health.invulnerability_ticks, 10);
        assert_eq!(config.health.checkpoint_interval, 500.0);
        assert_eq!(config.events.history_len, 0);
        assert_eq!(config.character, CharacterStats::default());
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = GameConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_inverted_active_window_is_rejected() {
        let mut config = GameConfig::default();
        config.combat.active_start = 0.8;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_degenerate_spawn_values_are_rejected() {
        let mut config = GameConfig::default();
        config.spawn.enemy_spacing = (0.0, 0.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::default();
        config.spawn.collectible_spacing = (f32::NAN, 100.0);
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.spawn.golden_chance = f64::NAN;
        assert!(config.validate().is_err());
    }
}
