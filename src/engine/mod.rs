// Engine modules: events, input, frame pacing, timers, persistence

pub mod events;
pub mod game_loop;
pub mod input;
pub mod persistence;
pub mod timers;
