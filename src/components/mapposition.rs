//! World-space position of an actor.
//!
//! The position is the actor's pivot: the point on the ground line under
//! its feet. Hurtboxes, contact boxes and attack hitboxes are all expressed
//! as offsets from this pivot.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}
