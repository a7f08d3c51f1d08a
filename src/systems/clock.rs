//! Tick clock and hit-stop gating.
//!
//! Every tick starts with [`hit_stop_gate`], which decides whether the tick
//! is frozen. Simulation systems run under the [`simulation_running`]
//! condition; presentation systems run on every tick so feedback keeps
//! animating through a freeze.
use bevy_ecs::prelude::*;

use crate::resources::feedback::FeedbackBus;
use crate::resources::gameconfig::GameConfig;
use crate::resources::simcontext::SimulationContext;

/// Consume one tick of hit-stop, marking the tick frozen if any was left.
pub fn hit_stop_gate(mut bus: ResMut<FeedbackBus>, mut ctx: ResMut<SimulationContext>) {
    ctx.frozen = bus.consume_hit_stop();
}

/// Run condition for the mutation phase.
pub fn simulation_running(ctx: Res<SimulationContext>) -> bool {
    !ctx.frozen
}

/// Advance the frame counter and ramp the global difficulty.
pub fn advance_clock(config: Res<GameConfig>, mut ctx: ResMut<SimulationContext>) {
    ctx.frame_count += 1;
    let cap = config.clock.difficulty_cap;
    ctx.difficulty = (ctx.difficulty + config.clock.difficulty_step).min(cap);
}
