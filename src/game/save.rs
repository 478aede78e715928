// Saved progress and currency
//
// Loading never fails: unreadable or out-of-range values are logged and
// replaced field by field with defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::persistence::{KeyValueStore, PersistenceError};

pub const PROGRESS_KEY: &str = "progress";
pub const CURRENCY_KEY: &str = "currency";

/// Health and checkpoint, stored under `progress`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub checkpoint: f32,
    pub health: u32,
    pub is_alive: bool,
}

impl ProgressRecord {
    /// Start of a new game
    pub fn fresh(max_health: u32) -> Self {
        Self {
            checkpoint: 0.0,
            health: max_health,
            is_alive: max_health > 0,
        }
    }
}

/// Collected currency, stored under `currency`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRecord {
    pub flower_count: u64,
}

/// Typed access to the two records on top of a key-value store
pub struct SaveSlot {
    store: Box<dyn KeyValueStore>,
}

impl SaveSlot {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load progress, validating every field against `max_health`
    pub fn load_progress(&self, max_health: u32) -> ProgressRecord {
        let fresh = ProgressRecord::fresh(max_health);
        let Some(value) = self.read(PROGRESS_KEY) else {
            return fresh;
        };

        let checkpoint = match value.get("checkpoint").and_then(Value::as_f64) {
            Some(c) if c.is_finite() && c >= 0.0 && c <= f64::from(f32::MAX) => c as f32,
            other => {
                log::warn!("Ignoring saved checkpoint {:?}", other);
                fresh.checkpoint
            }
        };

        let health = match value.get("health").and_then(Value::as_u64) {
            Some(h) if h <= u64::from(max_health) => h as u32,
            _ => {
                log::warn!(
                    "Ignoring saved health {:?} (max {})",
                    value.get("health"),
                    max_health
                );
                fresh.health
            }
        };

        let is_alive = match value.get("isAlive").and_then(Value::as_bool) {
            Some(alive) if alive == (health > 0) => alive,
            Some(alive) => {
                log::warn!(
                    "Saved isAlive={} contradicts health {}, using health",
                    alive,
                    health
                );
                health > 0
            }
            None => health > 0,
        };

        ProgressRecord {
            checkpoint,
            health,
            is_alive,
        }
    }

    pub fn save_progress(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError> {
        self.write(PROGRESS_KEY, record)
    }

    pub fn load_currency(&self) -> CurrencyRecord {
        let Some(value) = self.read(CURRENCY_KEY) else {
            return CurrencyRecord::default();
        };
        match value.get("flowerCount").and_then(Value::as_u64) {
            Some(flower_count) => CurrencyRecord { flower_count },
            None => {
                log::warn!("Ignoring saved flower count {:?}", value.get("flowerCount"));
                CurrencyRecord::default()
            }
        }
    }

    pub fn save_currency(&mut self, record: &CurrencyRecord) -> Result<(), PersistenceError> {
        self.write(CURRENCY_KEY, record)
    }

    /// Fetch and parse a record, treating every failure as missing data
    fn read(&self, key: &str) -> Option<Value> {
        let text = match self.store.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("Failed to read '{}': {}", key, err);
                return None;
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(value) if value.is_object() => Some(value),
            Ok(_) => {
                log::warn!("Saved '{}' is not an object, using defaults", key);
                None
            }
            Err(err) => {
                log::warn!("Saved '{}' is corrupt ({}), using defaults", key, err);
                None
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, record: &T) -> Result<(), PersistenceError> {
        let text = serde_json::to_string(record).map_err(|source| PersistenceError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &text)
    }
}
