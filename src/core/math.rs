// Collision geometry and easing helpers

use glam::Vec2;

/// Triangle ramp over `t` in [0, 1]: rises 0 -> 1 over the first half,
/// falls 1 -> 0 over the second half. Values outside [0, 1] yield 0.
pub fn triangle(t: f32) -> f32 {
    if !(0.0..=1.0).contains(&t) {
        return 0.0;
    }
    if t <= 0.5 {
        t * 2.0
    } else {
        (1.0 - t) * 2.0
    }
}

/// Axis-aligned rectangle in world coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow the rectangle by `amount` on every side
    pub fn expanded(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Inclusive overlap test (touching edges count as overlap)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// Overlap test with a tolerance added around `self`
    pub fn overlaps_padded(&self, other: &Rect, padding: f32) -> bool {
        self.expanded(padding).overlaps(other)
    }
}

/// Distance-between-centers test used for forgiving pickups
pub fn within_reach(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32, multiplier: f32) -> bool {
    a.distance(b) <= (a_radius + b_radius) * multiplier
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_triangle_ramp() {
        assert_relative_eq!(triangle(0.0), 0.0);
        assert_relative_eq!(triangle(0.25), 0.5);
        assert_relative_eq!(triangle(0.5), 1.0);
        assert_relative_eq!(triangle(0.75), 0.5);
        assert_relative_eq!(triangle(1.0), 0.0);
        assert_relative_eq!(triangle(-0.1), 0.0);
        assert_relative_eq!(triangle(1.1), 0.0);
    }

    #[test]
    fn test_rect_edges_and_center() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let apart = Rect::new(10.5, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_padding_makes_hits_generous() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let near = Rect::new(14.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&near));
        assert!(a.overlaps_padded(&near, 5.0));
        assert!(!a.overlaps_padded(&near, 3.0));
    }

    #[test]
    fn test_within_reach() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(30.0, 0.0);
        assert!(!within_reach(a, 10.0, b, 10.0, 1.0));
        assert!(within_reach(a, 10.0, b, 10.0, 1.5));
    }
}
