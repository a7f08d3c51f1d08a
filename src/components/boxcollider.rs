use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::actor::Facing;

/// Axis-aligned box expressed relative to an actor's pivot.
///
/// Offsets are authored for an actor facing right; [`BoxCollider::mirrored`]
/// flips the box around the pivot for actors facing left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub size: Vec2,
    pub offset: Vec2,
}

impl BoxCollider {
    /// Create a BoxCollider with given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
        }
    }

    /// Modify BoxCollider with given offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the box as seen by an actor with the given facing.
    pub fn mirrored(&self, facing: Facing) -> Self {
        match facing {
            Facing::Right => *self,
            Facing::Left => Self {
                size: self.size,
                offset: Vec2::new(-self.offset.x - self.size.x, self.offset.y),
            },
        }
    }

    /// Returns (min, max) of the collider AABB for a given entity position.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: Vec2) -> (Vec2, Vec2) {
        let p0 = position + self.offset;
        let p1 = p0 + self.size;
        (p0.min(p1), p0.max(p1))
    }

    /// AABB vs AABB overlap test against another BoxCollider at a different entity position.
    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, position: Vec2, other: &Self, other_position: Vec2) -> bool {
        let (min_a, max_a) = self.aabb(position);
        let (min_b, max_b) = other.aabb(other_position);
        min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
    }

    /// Centre of the intersection rectangle, if the boxes overlap.
    pub fn overlap_center(&self, position: Vec2, other: &Self, other_position: Vec2) -> Option<Vec2> {
        if !self.overlaps(position, other, other_position) {
            return None;
        }
        let (min_a, max_a) = self.aabb(position);
        let (min_b, max_b) = other.aabb(other_position);
        Some((min_a.max(min_b) + max_a.min(max_b)) * 0.5)
    }
}

/// Vulnerable rectangle of an actor, at a fixed offset from its pivot.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hurtbox(pub BoxCollider);

/// Damage-dealing rectangle an enemy pushes ahead of itself while approaching.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ContactBox(pub BoxCollider);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_applies_offset() {
        let b = BoxCollider::new(10.0, 20.0).with_offset(Vec2::new(5.0, -20.0));
        let (min, max) = b.aabb(Vec2::new(100.0, 50.0));
        assert_eq!(min, Vec2::new(105.0, 30.0));
        assert_eq!(max, Vec2::new(115.0, 50.0));
    }

    #[test]
    fn test_aabb_normalizes_negative_size() {
        let b = BoxCollider::new(-10.0, 4.0);
        let (min, max) = b.aabb(Vec2::ZERO);
        assert_eq!(min, Vec2::new(-10.0, 0.0));
        assert_eq!(max, Vec2::new(0.0, 4.0));
    }

    #[test]
    fn test_mirrored_left_flips_around_pivot() {
        let b = BoxCollider::new(100.0, 60.0).with_offset(Vec2::new(40.0, -130.0));
        let (min, max) = b.mirrored(Facing::Left).aabb(Vec2::new(400.0, 0.0));
        assert_eq!(min.x, 260.0);
        assert_eq!(max.x, 360.0);
        assert_eq!(min.y, -130.0);
    }

    #[test]
    fn test_mirrored_right_is_identity() {
        let b = BoxCollider::new(3.0, 3.0).with_offset(Vec2::new(1.0, 2.0));
        assert_eq!(b.mirrored(Facing::Right), b);
    }

    #[test]
    fn test_overlaps_excludes_touching_edges() {
        let a = BoxCollider::new(10.0, 10.0);
        let b = BoxCollider::new(10.0, 10.0);
        assert!(a.overlaps(Vec2::ZERO, &b, Vec2::new(9.9, 0.0)));
        assert!(!a.overlaps(Vec2::ZERO, &b, Vec2::new(10.0, 0.0)));
        assert!(!a.overlaps(Vec2::ZERO, &b, Vec2::new(0.0, 10.0)));
    }

    #[test]
    fn test_overlap_center() {
        let a = BoxCollider::new(10.0, 10.0);
        let b = BoxCollider::new(10.0, 10.0);
        let c = a.overlap_center(Vec2::ZERO, &b, Vec2::new(6.0, 0.0)).unwrap();
        assert_eq!(c, Vec2::new(8.0, 5.0));
        assert!(a.overlap_center(Vec2::ZERO, &b, Vec2::new(20.0, 0.0)).is_none());
    }
}
