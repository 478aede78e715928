// Limb animation derived from the action state
//
// Purely visual, but the attack progress and lunge it reports come from
// the same `AttackWindow` math the hit pipeline uses, so what is drawn
// matches what can hit.

use super::state::CharacterState;

/// Below this the decaying walk cycle snaps to zero
const WALK_CYCLE_EPSILON: f32 = 1e-3;

/// Walk cycle oscillator driving leg and arm swing
#[derive(Debug, Clone)]
pub struct LimbAnimator {
    /// Phase of the walk cycle in radians
    walk_cycle: f32,
    cycle_speed: f32,
    decay: f32,
    amplitude_deg: f32,
}

impl LimbAnimator {
    pub fn new(cycle_speed: f32, decay: f32, amplitude_deg: f32) -> Self {
        Self {
            walk_cycle: 0.0,
            cycle_speed,
            decay: decay.clamp(0.0, 1.0),
            amplitude_deg,
        }
    }

    /// Advance one tick
    ///
    /// While walking the cycle advances at a fixed speed; otherwise it decays
    /// toward zero so the legs settle instead of snapping.
    pub fn update(&mut self, is_walking: bool) {
        if is_walking {
            self.walk_cycle = (self.walk_cycle + self.cycle_speed) % std::f32::consts::TAU;
        } else {
            self.walk_cycle *= self.decay;
            if self.walk_cycle.abs() < WALK_CYCLE_EPSILON {
                self.walk_cycle = 0.0;
            }
        }
    }

    pub fn walk_cycle(&self) -> f32 {
        self.walk_cycle
    }

    /// Leg swing in degrees
    pub fn leg_swing(&self) -> f32 {
        self.walk_cycle.sin() * self.amplitude_deg
    }

    /// Arms swing against the legs
    pub fn arm_swing(&self) -> f32 {
        -self.leg_swing()
    }

    pub fn reset(&mut self) {
        self.walk_cycle = 0.0;
    }
}

/// Everything a renderer needs to pose the character for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct PoseData {
    pub state: CharacterState,
    pub animation_name: &'static str,
    pub leg_swing_deg: f32,
    pub arm_swing_deg: f32,
    /// Attack progress in [0, 1] while attacking
    pub attack_progress: Option<f32>,
    /// Forward lunge in [0, 1]
    pub lunge: f32,
    pub facing: f32,
}
