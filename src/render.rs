//! Read-only view of the simulation for the renderer.
//!
//! The engine never draws. After each tick it captures a [`RenderSnapshot`]
//! and hands it to the attached [`RenderSurface`], which maps actor states to
//! images and tones to colours.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;
use serde::Serialize;
use std::io::Write;

use crate::components::actor::{Actor, ActorKind, AnimClock, Facing};
use crate::components::actorstate::{
    EnemyState, EnemyStateMachine, PlayerState, PlayerStateMachine,
};
use crate::components::mapposition::MapPosition;
use crate::resources::backdrop::Backdrop;
use crate::resources::combo::ComboTracker;
use crate::resources::feedback::{FeedbackBus, FloatingText, Impact};
use crate::resources::simcontext::SimulationContext;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ActorStateView {
    Player(PlayerState),
    Enemy(EnemyState),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorView {
    pub entity: u64,
    pub kind: ActorKind,
    pub position: Vec2,
    pub facing: Facing,
    pub state: ActorStateView,
    pub state_timer: u32,
    pub anim_frame: u32,
}

impl ActorView {
    /// Dormant enemies are off the field and not drawn.
    pub fn is_visible(&self) -> bool {
        self.state != ActorStateView::Enemy(EnemyState::Dormant)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub difficulty: f32,
    pub score: i64,
    pub combo: u32,
    pub best_combo: u32,
    pub hit_stop: bool,
    pub shake_offset: Vec2,
    pub backdrop_offset: f32,
    pub actors: Vec<ActorView>,
    pub floating_texts: Vec<FloatingText>,
    pub impacts: Vec<Impact>,
}

impl RenderSnapshot {
    pub fn capture(world: &mut World) -> Self {
        let mut query = world.query::<(
            Entity,
            &Actor,
            &MapPosition,
            &AnimClock,
            Option<&PlayerStateMachine>,
            Option<&EnemyStateMachine>,
        )>();
        let mut actors: Vec<ActorView> = query
            .iter(world)
            .filter_map(|(entity, actor, pos, anim, psm, esm)| {
                let (state, state_timer) = match (psm, esm) {
                    (Some(sm), _) => (ActorStateView::Player(sm.state()), sm.timer()),
                    (_, Some(sm)) => (ActorStateView::Enemy(sm.state()), sm.timer()),
                    _ => return None,
                };
                Some(ActorView {
                    entity: entity.to_bits(),
                    kind: actor.kind,
                    position: pos.pos,
                    facing: actor.facing,
                    state,
                    state_timer,
                    anim_frame: anim.frame,
                })
            })
            .collect();
        actors.sort_by_key(|a| a.entity);

        let ctx = world.resource::<SimulationContext>();
        let combo = world.resource::<ComboTracker>();
        let bus = world.resource::<FeedbackBus>();
        let backdrop = world.resource::<Backdrop>();
        Self {
            frame: ctx.frame_count,
            difficulty: ctx.difficulty,
            score: ctx.score,
            combo: combo.count,
            best_combo: combo.best,
            hit_stop: ctx.frozen || bus.hit_stop_remaining() > 0,
            shake_offset: bus.shake_offset(),
            backdrop_offset: backdrop.offset,
            actors,
            floating_texts: bus.texts().to_vec(),
            impacts: bus.impacts().to_vec(),
        }
    }
}

/// Renderer seam.
pub trait RenderSurface {
    /// Acquire the drawing context. Failure aborts startup.
    fn open(&mut self) -> Result<(), String>;
    fn present(&mut self, snapshot: &RenderSnapshot) -> Result<(), String>;
}

/// How the headless surface reports frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlessMode {
    /// One JSON object per frame on stdout.
    JsonLines,
    /// An `info!` summary every N frames.
    Log { every: u64 },
}

/// Surface for runs without a display.
pub struct HeadlessSurface {
    mode: HeadlessMode,
    out: Box<dyn Write>,
}

impl HeadlessSurface {
    pub fn new(mode: HeadlessMode) -> Self {
        Self::with_writer(mode, Box::new(std::io::stdout()))
    }

    pub fn with_writer(mode: HeadlessMode, out: Box<dyn Write>) -> Self {
        Self { mode, out }
    }
}

impl RenderSurface for HeadlessSurface {
    fn open(&mut self) -> Result<(), String> {
        match self.mode {
            HeadlessMode::Log { every: 0 } => Err("report interval must be positive".into()),
            _ => Ok(()),
        }
    }

    fn present(&mut self, snapshot: &RenderSnapshot) -> Result<(), String> {
        match self.mode {
            HeadlessMode::JsonLines => {
                serde_json::to_writer(&mut self.out, snapshot).map_err(|e| e.to_string())?;
                writeln!(self.out).map_err(|e| e.to_string())
            }
            HeadlessMode::Log { every } => {
                if every > 0 && snapshot.frame % every == 0 {
                    let visible = snapshot.actors.iter().filter(|a| a.is_visible()).count();
                    info!(
                        "frame {} difficulty {:.3} score {} combo {} actors {}{}",
                        snapshot.frame,
                        snapshot.difficulty,
                        snapshot.score,
                        snapshot.combo,
                        visible,
                        if snapshot.hit_stop { " [hit-stop]" } else { "" }
                    );
                }
                Ok(())
            }
        }
    }
}
