// Durable key-value storage
//
// Backends only move strings around; record shapes and validation live
// with the game code that owns them.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Failed to encode record '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
