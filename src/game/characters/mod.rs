// Character system
//
// This module contains everything related to playable characters:
// - Character data structure and body geometry
// - Character stats and properties
// - Action state machine (walk, jump, attack, cooldown)
// - Limb animation derived from the action state

pub mod animation;
pub mod character;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use animation::{LimbAnimator, PoseData};
pub use character::Character;
pub use state::{ActionStateMachine, CharacterState, Transition};
pub use stats::{CharacterStats, BASE_STATS};
