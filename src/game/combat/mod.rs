// Combat
//
// - `window`: attack progress and its windup/active/recovery phases
// - `hitbox`: attack hitbox geometry derived from the window
// - `resolution`: per-tick overlap detection and outcome application

pub mod hitbox;
pub mod resolution;
pub mod window;

pub use hitbox::attack_hitbox;
pub use resolution::{ApplyOutcome, BodyContact, HitReport, HitResolver};
pub use window::{AttackPhase, AttackWindow};
