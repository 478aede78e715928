// Character action state machine
//
// Walking and jumping are independent flags so forward motion keeps going
// through a jump arc. Attacking and cooling down are mutually exclusive
// phases of the same counter pair.

use super::stats::CharacterStats;

/// Primary state tag, used to pick an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterState {
    #[default]
    Idle,
    Walking,
    Jumping,
    Attacking,
    CoolingDown,
}

impl CharacterState {
    /// Get the animation name for this state
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walking => "walk",
            Self::Jumping => "jump",
            Self::Attacking => "attack",
            Self::CoolingDown => "recover",
        }
    }
}

/// Something the state machine did that observers may care about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    JumpPeaked { y: f32 },
    Landed { y: f32 },
    AttackEnded { serial: u64 },
    CooldownStarted { ticks: u32 },
    CooldownTicked { remaining: u32 },
    CooldownEnded,
}

/// Per-character action state
///
/// Requests that are not legal right now (jumping mid-air, attacking during
/// cooldown) are ignored without error.
#[derive(Debug, Clone)]
pub struct ActionStateMachine {
    is_walking: bool,
    is_jumping: bool,
    jump_velocity: f32,
    /// Landing target captured at take-off
    ground_y: f32,
    is_attacking: bool,
    attack_frame: u32,
    attack_cooldown_remaining: u32,
    /// Incremented on every accepted attack
    attack_serial: u64,
    frozen: bool,

    jump_strength: f32,
    gravity: f32,
    attack_duration: u32,
    attack_cooldown: u32,
}

impl ActionStateMachine {
    pub fn new(stats: &CharacterStats) -> Self {
        Self {
            is_walking: false,
            is_jumping: false,
            jump_velocity: 0.0,
            ground_y: 0.0,
            is_attacking: false,
            attack_frame: 0,
            attack_cooldown_remaining: 0,
            attack_serial: 0,
            frozen: false,
            jump_strength: stats.jump_velocity,
            gravity: stats.gravity,
            attack_duration: stats.attack_duration.max(1),
            attack_cooldown: stats.attack_cooldown,
        }
    }

    pub fn state(&self) -> CharacterState {
        if self.is_attacking {
            CharacterState::Attacking
        } else if self.is_jumping {
            CharacterState::Jumping
        } else if self.is_walking {
            CharacterState::Walking
        } else if self.attack_cooldown_remaining > 0 {
            CharacterState::CoolingDown
        } else {
            CharacterState::Idle
        }
    }

    pub fn is_walking(&self) -> bool {
        self.is_walking
    }

    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    pub fn jump_velocity(&self) -> f32 {
        self.jump_velocity
    }

    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    pub fn attack_frame(&self) -> u32 {
        self.attack_frame
    }

    pub fn attack_duration(&self) -> u32 {
        self.attack_duration
    }

    pub fn attack_cooldown_remaining(&self) -> u32 {
        self.attack_cooldown_remaining
    }

    pub fn attack_serial(&self) -> u64 {
        self.attack_serial
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Attack progress in [0, 1], only while attacking
    pub fn attack_progress(&self) -> Option<f32> {
        self.is_attacking
            .then(|| self.attack_frame as f32 / self.attack_duration as f32)
    }

    /// Begin walking. Returns true if the flag changed.
    pub fn start_moving(&mut self) -> bool {
        if self.frozen || self.is_walking {
            return false;
        }
        self.is_walking = true;
        true
    }

    /// Stop walking. Returns true if the flag changed.
    pub fn stop_moving(&mut self) -> bool {
        if !self.is_walking {
            return false;
        }
        self.is_walking = false;
        true
    }

    /// Take off from `current_y`, which becomes the landing target
    pub fn start_jump(&mut self, current_y: f32) -> bool {
        if self.frozen || self.is_jumping {
            return false;
        }
        self.is_jumping = true;
        self.jump_velocity = self.jump_strength;
        self.ground_y = current_y;
        true
    }

    /// Start an attack if neither attacking nor cooling down
    pub fn start_attack(&mut self) -> bool {
        if self.frozen || self.is_attacking || self.attack_cooldown_remaining > 0 {
            return false;
        }
        self.is_attacking = true;
        self.attack_frame = 0;
        self.attack_serial += 1;
        true
    }

    /// Advance one tick. `y` is the character's vertical position (y grows
    /// downward) and is moved along the jump arc.
    pub fn update(&mut self, y: &mut f32) -> Vec<Transition> {
        let mut transitions = Vec::new();
        if self.frozen {
            return transitions;
        }

        if self.is_jumping {
            *y -= self.jump_velocity;
            let was_rising = self.jump_velocity > 0.0;
            self.jump_velocity -= self.gravity;
            if was_rising && self.jump_velocity <= 0.0 {
                transitions.push(Transition::JumpPeaked { y: *y });
            }
            if *y >= self.ground_y {
                *y = self.ground_y;
                self.is_jumping = false;
                self.jump_velocity = 0.0;
                transitions.push(Transition::Landed { y: *y });
            }
        }

        if self.is_attacking {
            self.attack_frame += 1;
            if self.attack_frame >= self.attack_duration {
                self.is_attacking = false;
                self.attack_frame = 0;
                self.attack_cooldown_remaining = self.attack_cooldown;
                transitions.push(Transition::AttackEnded {
                    serial: self.attack_serial,
                });
                if self.attack_cooldown > 0 {
                    transitions.push(Transition::CooldownStarted {
                        ticks: self.attack_cooldown,
                    });
                }
            }
        } else if self.attack_cooldown_remaining > 0 {
            self.attack_cooldown_remaining -= 1;
            if self.attack_cooldown_remaining == 0 {
                transitions.push(Transition::CooldownEnded);
            } else {
                transitions.push(Transition::CooldownTicked {
                    remaining: self.attack_cooldown_remaining,
                });
            }
        }

        transitions
    }

    /// Stop all motion and attacks; further requests are ignored until `unfreeze`
    ///
    /// The attack cooldown is kept.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.is_walking = false;
        self.is_jumping = false;
        self.jump_velocity = 0.0;
        self.is_attacking = false;
        self.attack_frame = 0;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    /// Back to standing still on the ground; cooldown survives the restart
    pub fn reset_for_restart(&mut self) {
        self.is_walking = false;
        self.is_jumping = false;
        self.jump_velocity = 0.0;
        self.is_attacking = false;
        self.attack_frame = 0;
    }
}
