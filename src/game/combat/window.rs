// Attack timing window

use crate::core::math::triangle;
use crate::game::config::CombatConfig;

/// Phase of an attack, derived from its progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackPhase {
    /// Startup frames, no hitbox
    Windup,
    /// Hitbox exists and can deal damage
    Active,
    /// Recovery frames, no hitbox
    Recovery,
}

impl AttackPhase {
    pub fn can_damage(&self) -> bool {
        *self == Self::Active
    }
}

/// Snapshot of where an attack is within its timing window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackWindow {
    progress: f32,
    active_start: f32,
    active_end: f32,
}

impl AttackWindow {
    /// Window for `frame` of an attack lasting `duration` ticks
    pub fn at(frame: u32, duration: u32, config: &CombatConfig) -> Self {
        Self::from_progress(frame as f32 / duration.max(1) as f32, config)
    }

    pub fn from_progress(progress: f32, config: &CombatConfig) -> Self {
        Self {
            progress,
            active_start: config.active_start,
            active_end: config.active_end,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn phase(&self) -> AttackPhase {
        if self.progress < self.active_start {
            AttackPhase::Windup
        } else if self.progress <= self.active_end {
            AttackPhase::Active
        } else {
            AttackPhase::Recovery
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase().can_damage()
    }

    /// Position within the active sub-range, 0 at its start and 1 at its end
    pub fn active_fraction(&self) -> Option<f32> {
        if !self.is_active() {
            return None;
        }
        let span = self.active_end - self.active_start;
        if span <= 0.0 {
            return Some(0.5);
        }
        Some((self.progress - self.active_start) / span)
    }

    /// Forward lunge in [0, 1]: rises across the first half of the active
    /// window and falls across the second half
    pub fn lunge(&self) -> f32 {
        self.active_fraction().map(triangle).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::DEFAULT_COMBAT;
    use approx::assert_relative_eq;

    #[test]
    fn test_phases_over_a_full_attack() {
        let mut active_frames = Vec::new();
        for frame in 0..=40 {
            let window = AttackWindow::at(frame, 40, &DEFAULT_COMBAT);
            match window.phase() {
                AttackPhase::Windup => assert!(window.progress() < 0.2),
                AttackPhase::Active => active_frames.push(frame),
                AttackPhase::Recovery => assert!(window.progress() > 0.7),
            }
        }
        assert_eq!(active_frames, (8..=28).collect::<Vec<u32>>());
    }

    #[test]
    fn test_lunge_peaks_mid_window() {
        let start = AttackWindow::from_progress(0.2, &DEFAULT_COMBAT);
        let mid = AttackWindow::from_progress(0.45, &DEFAULT_COMBAT);
        let end = AttackWindow::from_progress(0.7, &DEFAULT_COMBAT);
        assert_relative_eq!(start.lunge(), 0.0);
        assert_relative_eq!(mid.lunge(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(end.lunge(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_no_lunge_outside_window() {
        assert_eq!(AttackWindow::from_progress(0.1, &DEFAULT_COMBAT).lunge(), 0.0);
        assert_eq!(AttackWindow::from_progress(0.9, &DEFAULT_COMBAT).lunge(), 0.0);
        assert_eq!(
            AttackWindow::from_progress(0.9, &DEFAULT_COMBAT).active_fraction(),
            None
        );
    }
}
