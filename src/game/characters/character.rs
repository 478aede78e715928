// Character entity: action state, limb animation and body geometry

use glam::Vec2;

use crate::core::Rect;
use crate::engine::input::ActionSignal;
use crate::game::combat::{attack_hitbox, AttackWindow};
use crate::game::config::CombatConfig;
use crate::game::events::{GameBus, GameEvent};

use super::animation::{LimbAnimator, PoseData};
use super::state::{ActionStateMachine, CharacterState, Transition};
use super::stats::CharacterStats;

/// A player-controlled figure in the world
///
/// Position is the point between the feet, in world coordinates with y
/// growing downward.
#[derive(Debug, Clone)]
pub struct Character {
    /// Character name (for logging)
    pub name: String,
    stats: CharacterStats,
    state_machine: ActionStateMachine,
    animation: LimbAnimator,
    position: Vec2,
    /// Direction character is facing (1 = right, -1 = left)
    facing_direction: f32,
}

impl Character {
    pub fn new(name: &str, stats: CharacterStats, position: Vec2) -> Self {
        Self {
            name: name.to_string(),
            state_machine: ActionStateMachine::new(&stats),
            animation: LimbAnimator::new(
                stats.walk_cycle_speed,
                stats.walk_cycle_decay,
                stats.swing_amplitude_deg,
            ),
            stats,
            position,
            facing_direction: 1.0,
        }
    }

    /// Feed one input signal to the state machine, announcing accepted ones
    ///
    /// Returns false when the signal was not legal right now and was ignored.
    pub fn apply_signal(&mut self, signal: ActionSignal, bus: &mut GameBus) -> bool {
        match signal {
            ActionSignal::MoveStart => {
                let changed = self.state_machine.start_moving();
                if changed {
                    bus.publish(GameEvent::MoveStart);
                }
                changed
            }
            ActionSignal::MoveStop => {
                let changed = self.state_machine.stop_moving();
                if changed {
                    bus.publish(GameEvent::MoveStop);
                }
                changed
            }
            ActionSignal::JumpStart => {
                let accepted = self.state_machine.start_jump(self.position.y);
                if accepted {
                    bus.publish(GameEvent::JumpStart {
                        y: self.position.y,
                        velocity: self.state_machine.jump_velocity(),
                    });
                }
                accepted
            }
            ActionSignal::AttackStart => {
                let accepted = self.state_machine.start_attack();
                if accepted {
                    log::debug!("{} attack #{}", self.name, self.state_machine.attack_serial());
                    bus.publish(GameEvent::AttackStart {
                        serial: self.state_machine.attack_serial(),
                    });
                }
                accepted
            }
        }
    }

    /// Advance the state machine and limb animation by one tick
    pub fn update(&mut self, bus: &mut GameBus) {
        let transitions = self.state_machine.update(&mut self.position.y);
        self.animation.update(self.state_machine.is_walking());

        let total_cooldown = self.stats.attack_cooldown;
        for transition in transitions {
            let event = match transition {
                Transition::JumpPeaked { y } => GameEvent::JumpPeak { y },
                Transition::Landed { y } => GameEvent::JumpEnd { y },
                Transition::AttackEnded { serial } => GameEvent::AttackEnd { serial },
                Transition::CooldownStarted { ticks } => GameEvent::CooldownStart { ticks },
                Transition::CooldownTicked { remaining } => GameEvent::CooldownUpdate {
                    remaining,
                    total: total_cooldown,
                },
                Transition::CooldownEnded => GameEvent::CooldownEnd,
            };
            bus.publish(event);
        }
    }

    /// Current attack window, while attacking
    pub fn attack_window(&self, config: &CombatConfig) -> Option<AttackWindow> {
        self.state_machine.is_attacking().then(|| {
            AttackWindow::at(
                self.state_machine.attack_frame(),
                self.state_machine.attack_duration(),
                config,
            )
        })
    }

    /// Attack hitbox, present only during the active part of an attack
    pub fn attack_hitbox(&self, config: &CombatConfig) -> Option<Rect> {
        let window = self.attack_window(config)?;
        attack_hitbox(
            self.position,
            self.body_size(),
            self.facing_direction,
            &window,
            config,
        )
    }

    /// The character's own collision volume
    pub fn body_rect(&self) -> Rect {
        Rect::new(
            self.position.x - self.stats.width / 2.0,
            self.position.y - self.stats.height,
            self.stats.width,
            self.stats.height,
        )
    }

    pub fn body_size(&self) -> Vec2 {
        Vec2::new(self.stats.width, self.stats.height)
    }

    pub fn body_center(&self) -> Vec2 {
        self.body_rect().center()
    }

    pub fn body_radius(&self) -> f32 {
        self.stats.body_radius()
    }

    /// Snapshot for renderers
    pub fn pose(&self, config: &CombatConfig) -> PoseData {
        let state = self.state();
        let window = self.attack_window(config);
        PoseData {
            state,
            animation_name: state.animation_name(),
            leg_swing_deg: self.animation.leg_swing(),
            arm_swing_deg: self.animation.arm_swing(),
            attack_progress: window.map(|w| w.progress()),
            lunge: window.map(|w| w.lunge()).unwrap_or(0.0),
            facing: self.facing_direction,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move horizontally (the world scrolls under a fixed screen position)
    pub fn set_world_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub fn facing(&self) -> f32 {
        self.facing_direction
    }

    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    pub fn state(&self) -> CharacterState {
        self.state_machine.state()
    }

    pub fn state_machine(&self) -> &ActionStateMachine {
        &self.state_machine
    }

    pub fn is_walking(&self) -> bool {
        self.state_machine.is_walking()
    }

    pub fn is_attacking(&self) -> bool {
        self.state_machine.is_attacking()
    }

    pub fn attack_serial(&self) -> u64 {
        self.state_machine.attack_serial()
    }

    /// Stop all motion (game over, restart in progress)
    pub fn freeze(&mut self) {
        self.state_machine.freeze();
    }

    pub fn unfreeze(&mut self) {
        self.state_machine.unfreeze();
    }

    /// Put the character back on its feet at `position`, keeping cooldown
    pub fn reset_for_restart(&mut self, position: Vec2) {
        self.state_machine.reset_for_restart();
        self.animation.reset();
        self.position = position;
        self.facing_direction = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::DEFAULT_COMBAT;
    use crate::game::events::{game_bus, EventKind};

    fn hero() -> Character {
        Character::new("hero", CharacterStats::default(), Vec2::new(150.0, 400.0))
    }

    fn kinds(bus: &GameBus) -> Vec<EventKind> {
        bus.history().iter().map(|e| e.kind()).collect()
    }

    #[test]
    fn test_body_rect_stands_on_feet() {
        let c = hero();
        let body = c.body_rect();
        assert_eq!(body.bottom(), 400.0);
        assert_eq!(body.center().x, 150.0);
        assert_eq!(body.height, 80.0);
    }

    #[test]
    fn test_accepted_signals_publish_events() {
        let mut c = hero();
        let mut bus = game_bus(32);
        assert!(c.apply_signal(ActionSignal::MoveStart, &mut bus));
        assert!(!c.apply_signal(ActionSignal::MoveStart, &mut bus));
        assert!(c.apply_signal(ActionSignal::AttackStart, &mut bus));
        assert!(!c.apply_signal(ActionSignal::AttackStart, &mut bus));
        assert!(c.apply_signal(ActionSignal::JumpStart, &mut bus));

        assert_eq!(
            kinds(&bus),
            vec![EventKind::MoveStart, EventKind::AttackStart, EventKind::JumpStart]
        );
    }

    #[test]
    fn test_full_jump_publishes_peak_and_end() {
        let mut c = hero();
        let mut bus = game_bus(256);
        c.apply_signal(ActionSignal::JumpStart, &mut bus);
        for _ in 0..40 {
            c.update(&mut bus);
        }
        let kinds = kinds(&bus);
        assert!(kinds.contains(&EventKind::JumpPeak));
        assert!(kinds.contains(&EventKind::JumpEnd));
        assert_eq!(c.position().y, 400.0);
    }

    #[test]
    fn test_attack_publishes_end_and_cooldown() {
        let mut c = hero();
        let mut bus = game_bus(512);
        c.apply_signal(ActionSignal::AttackStart, &mut bus);
        for _ in 0..45 {
            c.update(&mut bus);
        }
        let kinds = kinds(&bus);
        assert!(kinds.contains(&EventKind::AttackEnd));
        assert!(kinds.contains(&EventKind::CooldownStart));
        assert!(kinds.contains(&EventKind::CooldownUpdate));
    }

    #[test]
    fn test_hitbox_follows_attack_progress() {
        let mut c = hero();
        let mut bus = game_bus(0);
        assert!(c.attack_hitbox(&DEFAULT_COMBAT).is_none());

        c.apply_signal(ActionSignal::AttackStart, &mut bus);
        for _ in 0..7 {
            c.update(&mut bus);
        }
        assert!(c.attack_hitbox(&DEFAULT_COMBAT).is_none(), "windup must be safe");
        c.update(&mut bus);
        assert!(c.attack_hitbox(&DEFAULT_COMBAT).is_some());
    }

    #[test]
    fn test_pose_reports_attack_progress() {
        let mut c = hero();
        let mut bus = game_bus(0);
        c.apply_signal(ActionSignal::AttackStart, &mut bus);
        for _ in 0..18 {
            c.update(&mut bus);
        }
        let pose = c.pose(&DEFAULT_COMBAT);
        assert_eq!(pose.state, CharacterState::Attacking);
        assert_eq!(pose.animation_name, "attack");
        assert_eq!(pose.attack_progress, Some(0.45));
        assert!(pose.lunge > 0.9);
    }

    #[test]
    fn test_reset_for_restart() {
        let mut c = hero();
        let mut bus = game_bus(0);
        c.apply_signal(ActionSignal::MoveStart, &mut bus);
        c.apply_signal(ActionSignal::JumpStart, &mut bus);
        c.update(&mut bus);
        c.reset_for_restart(Vec2::new(650.0, 400.0));
        assert_eq!(c.position(), Vec2::new(650.0, 400.0));
        assert_eq!(c.state(), CharacterState::Idle);
    }
}
