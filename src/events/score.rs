//! Score changes, emitted once per scoring combat event.
//!
//! Produced by the combo system after the score has been applied; consumed
//! by the feedback bus to schedule shake, hit-stop and floating text.

use bevy_ecs::message::Message;
use glam::Vec2;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreCause {
    Hit,
    /// Normal hit that reached the death threshold; delta includes the bonus.
    Kill,
    Parry,
    PlayerHit,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreEvent {
    /// Nominal delta; the applied change may be smaller at the score floor.
    pub delta: i64,
    /// Impact coordinates in field space.
    pub at: Vec2,
    pub cause: ScoreCause,
}
