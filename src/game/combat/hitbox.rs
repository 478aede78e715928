// Attack hitbox geometry

use glam::Vec2;

use super::window::AttackWindow;
use crate::core::Rect;
use crate::game::config::CombatConfig;

/// Height of the strike above the feet, as a fraction of body height
const STRIKE_HEIGHT: f32 = 0.6;

/// Compute the attack hitbox for a character standing with its feet at
/// `feet` and facing `facing` (+1 right, -1 left)
///
/// Returns `None` outside the active window: windup and recovery frames
/// never deal damage.
pub fn attack_hitbox(
    feet: Vec2,
    body_size: Vec2,
    facing: f32,
    window: &AttackWindow,
    config: &CombatConfig,
) -> Option<Rect> {
    if !window.is_active() {
        return None;
    }

    let lunge = window.lunge() * config.lunge_distance;
    let front = feet.x + facing.signum() * (body_size.x / 2.0 + lunge);
    let left = if facing >= 0.0 {
        front
    } else {
        front - config.reach
    };
    let center_y = feet.y - body_size.y * STRIKE_HEIGHT;

    Some(Rect::new(
        left,
        center_y - config.hitbox_height / 2.0,
        config.reach,
        config.hitbox_height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::DEFAULT_COMBAT;
    use approx::assert_relative_eq;

    const FEET: Vec2 = Vec2::new(100.0, 400.0);
    const BODY: Vec2 = Vec2::new(40.0, 80.0);

    #[test]
    fn test_hitbox_absent_outside_active_window() {
        for frame in 0..=40 {
            let window = AttackWindow::at(frame, 40, &DEFAULT_COMBAT);
            let hitbox = attack_hitbox(FEET, BODY, 1.0, &window, &DEFAULT_COMBAT);
            let p = window.progress();
            if p < 0.2 || p > 0.7 {
                assert!(hitbox.is_none(), "hitbox at progress {p}");
            } else {
                assert!(hitbox.is_some(), "no hitbox at progress {p}");
            }
        }
    }

    #[test]
    fn test_hitbox_in_front_of_body() {
        let window = AttackWindow::from_progress(0.2, &DEFAULT_COMBAT);
        let hitbox = attack_hitbox(FEET, BODY, 1.0, &window, &DEFAULT_COMBAT).unwrap();
        assert_relative_eq!(hitbox.left(), 120.0);
        assert_relative_eq!(hitbox.width, DEFAULT_COMBAT.reach);
        assert_relative_eq!(hitbox.center().y, 400.0 - 48.0);
    }

    #[test]
    fn test_hitbox_lunges_forward() {
        let start = AttackWindow::from_progress(0.2, &DEFAULT_COMBAT);
        let mid = AttackWindow::from_progress(0.45, &DEFAULT_COMBAT);
        let a = attack_hitbox(FEET, BODY, 1.0, &start, &DEFAULT_COMBAT).unwrap();
        let b = attack_hitbox(FEET, BODY, 1.0, &mid, &DEFAULT_COMBAT).unwrap();
        assert_relative_eq!(b.left() - a.left(), DEFAULT_COMBAT.lunge_distance, epsilon = 1e-3);
    }

    #[test]
    fn test_hitbox_mirrors_when_facing_left() {
        let window = AttackWindow::from_progress(0.2, &DEFAULT_COMBAT);
        let hitbox = attack_hitbox(FEET, BODY, -1.0, &window, &DEFAULT_COMBAT).unwrap();
        assert_relative_eq!(hitbox.right(), 80.0);
    }
}
