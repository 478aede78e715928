// Game layer: characters, combat, entities, health and the session that
// ties them together on one event bus

pub mod characters;
pub mod combat;
pub mod config;
pub mod context;
pub mod entities;
pub mod events;
pub mod health;
pub mod save;
pub mod session;
