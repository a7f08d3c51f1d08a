//! Actor updates: state timers, input, movement and cosmetic animation.
//!
//! Ordering inside a simulated tick:
//! 1. [`advance_player`] and [`advance_enemies`] bump state timers and apply
//!    timeouts; enemies in `Approaching` move by their current speed.
//! 2. [`consume_player_input`] runs after the player's timer so an attack
//!    entered this tick starts at timer 0.
//! 3. [`animate_actors`] advances walk cycles for actors in a steady state.
//!
//! # Related
//! - [`crate::components::actorstate`] – the transition table
//! - [`crate::systems::hitresolve`] – hit-driven transitions

use bevy_ecs::prelude::*;
use log::{debug, warn};
use std::fmt;

use crate::components::actor::{Actor, AnimClock, Enemy, Facing, PinnedAction, Player};
use crate::components::actorstate::{
    AttackKind, EnemyState, EnemyStateMachine, PlayerState, PlayerStateMachine, TransitionConflict,
};
use crate::components::mapposition::MapPosition;
use crate::events::audio::AudioCue;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputLatch;
use crate::resources::roster::Roster;
use crate::resources::simcontext::SimulationContext;
use crate::resources::simrng::SimRng;

/// Log a refused double transition and count it.
pub(crate) fn report_conflict<S: fmt::Debug>(
    ctx: &mut SimulationContext,
    entity: Entity,
    conflict: TransitionConflict<S>,
) {
    warn!("invariant violation on {:?}: {}", entity, conflict);
    ctx.invariant_violations += 1;
}

pub fn advance_player(
    roster: Res<Roster>,
    ctx: Res<SimulationContext>,
    mut query: Query<(Entity, &mut PlayerStateMachine, &mut Player)>,
) {
    for (entity, mut sm, mut player) in query.iter_mut() {
        if let Some(previous) = sm.advance(&roster.player, ctx.frame_count) {
            debug!(
                "{:?}: {:?} -> {:?} at frame {}",
                entity,
                previous,
                sm.state(),
                ctx.frame_count
            );
            if matches!(previous, PlayerState::Attacking(_)) {
                player.action = None;
            }
        }
    }
}

/// Start the latched attack if the player is free to act.
///
/// A command that finds the player busy is dropped. The attack pins its
/// hitbox and picks a visual variant; all variants share the geometry.
pub fn consume_player_input(
    roster: Res<Roster>,
    mut latch: ResMut<InputLatch>,
    mut ctx: ResMut<SimulationContext>,
    mut rng: ResMut<SimRng>,
    mut query: Query<(
        Entity,
        &mut PlayerStateMachine,
        &mut Player,
        &mut Actor,
        &mut AnimClock,
    )>,
    mut cues: MessageWriter<AudioCue>,
) {
    let Some(command) = latch.take() else {
        return;
    };
    let Ok((entity, mut sm, mut player, mut actor, mut anim)) = query.single_mut() else {
        return;
    };
    let frame = ctx.frame_count;
    if sm.state() != PlayerState::Walking || sm.changed_on(frame) {
        debug!("{:?} dropped: player is {:?}", command, sm.state());
        return;
    }

    let kind = command.attack_kind();
    if let Err(conflict) = sm.enter(PlayerState::Attacking(kind), frame) {
        report_conflict(&mut ctx, entity, conflict);
        return;
    }
    let spec = roster.player.action(kind);
    let variant = rng.0.u8(0..spec.variants.max(1));
    player.action = Some(PinnedAction {
        kind,
        variant,
        hitbox: spec.hitbox,
        landed: None,
    });
    actor.facing = match kind {
        AttackKind::Primary => Facing::Right,
        AttackKind::Secondary => Facing::Left,
        AttackKind::Low => actor.facing,
    };
    anim.reset();
    cues.write(AudioCue::Swing);
    debug!("{:?} attacks {:?} (variant {})", entity, kind, variant);
}

pub fn advance_enemies(
    roster: Res<Roster>,
    config: Res<GameConfig>,
    ctx: Res<SimulationContext>,
    mut query: Query<(
        Entity,
        &mut EnemyStateMachine,
        &mut Enemy,
        &Actor,
        &mut MapPosition,
    )>,
) {
    let frame = ctx.frame_count;
    for (entity, mut sm, mut enemy, actor, mut pos) in query.iter_mut() {
        let Some(archetype) = roster.enemy(enemy.type_id) else {
            continue;
        };
        if let Some(previous) = sm.advance(archetype, frame) {
            debug!(
                "{:?} ({}): {:?} -> {:?} at frame {}",
                entity,
                archetype.name,
                previous,
                sm.state(),
                frame
            );
        }
        enemy.speed_current = (enemy.speed_base * ctx.difficulty).min(config.spawn.speed_max);
        if sm.state() == EnemyState::Approaching {
            pos.pos.x += actor.facing.sign() * enemy.speed_current;
        }
    }
}

/// Walk cycles only run in steady states; attack, stagger and death poses
/// are keyed by the state timer instead.
pub fn animate_actors(
    roster: Res<Roster>,
    mut query: Query<(
        &Actor,
        &mut AnimClock,
        Option<&PlayerStateMachine>,
        Option<&EnemyStateMachine>,
    )>,
) {
    for (actor, mut anim, player_sm, enemy_sm) in query.iter_mut() {
        let steady = match (player_sm, enemy_sm) {
            (Some(sm), _) => sm.state() == PlayerState::Walking,
            (_, Some(sm)) => sm.state() == EnemyState::Approaching,
            _ => false,
        };
        if !steady {
            continue;
        }
        if let Some(spec) = roster.walk_anim(actor.kind) {
            anim.step(spec.frames, spec.ticks_per_frame);
        }
    }
}
