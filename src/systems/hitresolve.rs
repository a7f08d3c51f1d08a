//! Hit resolution between attack hitboxes, hurtboxes and contact boxes.
//!
//! Three passes run in a fixed order each simulated tick:
//! 1. [`resolve_player_attacks`]: the player's pinned hitbox against enemy
//!    hurtboxes.
//! 2. [`resolve_enemy_contacts`]: enemy contact boxes against the player's
//!    hurtbox.
//! 3. [`detect_escapes`]: enemies that crossed the trailing edge.
//!
//! The order gives the player's attack priority: an enemy hit in pass 1
//! leaves `Approaching` and can neither strike the player nor escape in the
//! same tick.
//!
//! Contract:
//! - Only actors in a hittable state that did not change state this tick
//!   are considered as victims.
//! - Each attack instance scores at most one hit. Among several overlapping
//!   victims the one nearest the attacker is taken.
//! - Boxes touching at an edge do not overlap.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::components::actor::{Actor, Enemy, EnemyTypeId, Facing, Player};
use crate::components::actorstate::{
    EnemyState, EnemyStateMachine, PlayerState, PlayerStateMachine,
};
use crate::components::boxcollider::{ContactBox, Hurtbox};
use crate::components::mapposition::MapPosition;
use crate::events::audio::AudioCue;
use crate::events::combat::CombatEvent;
use crate::resources::gameconfig::GameConfig;
use crate::resources::roster::{HitKind, Roster};
use crate::resources::simcontext::SimulationContext;
use crate::systems::actors::report_conflict;

/// Overlapping victim: (distance to attacker, entity, impact point).
type Candidate = (f32, Entity, Vec2);

pub fn resolve_player_attacks(
    roster: Res<Roster>,
    mut ctx: ResMut<SimulationContext>,
    mut players: Query<
        (Entity, &mut Player, &PlayerStateMachine, &Actor, &MapPosition),
        Without<Enemy>,
    >,
    mut enemies: Query<
        (Entity, &mut Enemy, &mut EnemyStateMachine, &MapPosition, &Hurtbox),
        Without<Player>,
    >,
    mut combat: MessageWriter<CombatEvent>,
    mut cues: MessageWriter<AudioCue>,
    mut voice_cursor: Local<FxHashMap<EnemyTypeId, u32>>,
) {
    let frame = ctx.frame_count;
    for (attacker, mut player, psm, actor, ppos) in players.iter_mut() {
        if !matches!(psm.state(), PlayerState::Attacking(_)) {
            continue;
        }
        let Some(action) = player.action.as_mut() else {
            continue;
        };
        if action.landed.is_some() {
            continue;
        }
        let Some(kind) = action.hitbox.classify(psm.timer()) else {
            continue;
        };
        let hitbox = action.hitbox.collider().mirrored(actor.facing);

        let mut candidates: SmallVec<[Candidate; 4]> = SmallVec::new();
        for (victim, _, esm, epos, hurtbox) in enemies.iter() {
            if esm.state() != EnemyState::Approaching || esm.changed_on(frame) {
                continue;
            }
            if let Some(at) = hitbox.overlap_center(ppos.pos, &hurtbox.0, epos.pos) {
                candidates.push(((epos.pos.x - ppos.pos.x).abs(), victim, at));
            }
        }
        let Some(&(_, victim, at)) = candidates.iter().min_by(|a, b| a.0.total_cmp(&b.0)) else {
            continue;
        };

        let Ok((_, mut enemy, mut esm, _, _)) = enemies.get_mut(victim) else {
            continue;
        };
        let Some(archetype) = roster.enemy(enemy.type_id) else {
            continue;
        };
        let lethal = kind == HitKind::Parry || enemy.hit_count + 1 >= archetype.death_threshold;
        let next = if lethal {
            EnemyState::Dying
        } else {
            EnemyState::Staggered
        };
        if let Err(conflict) = esm.enter(next, frame) {
            report_conflict(&mut ctx, victim, conflict);
            continue;
        }
        if kind == HitKind::Normal {
            enemy.hit_count += 1;
        }
        action.landed = Some(victim);
        if lethal {
            ctx.kills += 1;
        }
        debug!(
            "{:?} hit {:?} ({}) {:?} at timer {}: {}/{} lethal={}",
            attacker,
            victim,
            archetype.name,
            kind,
            psm.timer(),
            enemy.hit_count,
            archetype.death_threshold,
            lethal
        );

        combat.write(CombatEvent::Hit {
            attacker,
            victim,
            kind,
            lethal,
            at,
        });
        cues.write(match (kind, lethal) {
            (HitKind::Parry, _) => AudioCue::Parry,
            (HitKind::Normal, true) => AudioCue::Kill,
            (HitKind::Normal, false) => AudioCue::Hit,
        });
        let cursor = voice_cursor.entry(enemy.type_id).or_insert(0);
        cues.write(AudioCue::EnemyVoice {
            enemy: enemy.type_id,
            index: *cursor % archetype.voices.max(1),
        });
        *cursor = cursor.wrapping_add(1);
    }
}

/// Stagger the walking player when an approaching enemy's contact box
/// reaches its hurtbox. Each approach strikes at most once.
pub fn resolve_enemy_contacts(
    mut ctx: ResMut<SimulationContext>,
    mut players: Query<(&mut PlayerStateMachine, &MapPosition, &Hurtbox), Without<Enemy>>,
    mut enemies: Query<
        (
            Entity,
            &mut Enemy,
            &EnemyStateMachine,
            &Actor,
            &MapPosition,
            &ContactBox,
        ),
        Without<Player>,
    >,
    mut combat: MessageWriter<CombatEvent>,
    mut cues: MessageWriter<AudioCue>,
) {
    let frame = ctx.frame_count;
    let Ok((mut psm, ppos, phurt)) = players.single_mut() else {
        return;
    };
    for (entity, mut enemy, esm, actor, epos, contact) in enemies.iter_mut() {
        if esm.state() != EnemyState::Approaching || enemy.struck_player {
            continue;
        }
        if psm.state() != PlayerState::Walking || psm.changed_on(frame) {
            break;
        }
        let contact = contact.0.mirrored(actor.facing);
        let Some(at) = contact.overlap_center(epos.pos, &phurt.0, ppos.pos) else {
            continue;
        };
        if let Err(conflict) = psm.enter(PlayerState::Staggered, frame) {
            report_conflict(&mut ctx, entity, conflict);
            break;
        }
        enemy.struck_player = true;
        ctx.player_hits += 1;
        debug!("{:?} struck the player at frame {}", entity, frame);
        combat.write(CombatEvent::PlayerHit { enemy: entity, at });
        cues.write(AudioCue::PlayerHit);
    }
}

/// Recycle approaching enemies whose hurtbox left the field on the trailing
/// side. An escape is a miss, not an error.
pub fn detect_escapes(
    config: Res<GameConfig>,
    mut ctx: ResMut<SimulationContext>,
    mut enemies: Query<(
        Entity,
        &mut EnemyStateMachine,
        &Actor,
        &MapPosition,
        &Hurtbox,
    )>,
    mut combat: MessageWriter<CombatEvent>,
    mut cues: MessageWriter<AudioCue>,
) {
    let frame = ctx.frame_count;
    for (entity, mut esm, actor, pos, hurtbox) in enemies.iter_mut() {
        if esm.state() != EnemyState::Approaching {
            continue;
        }
        let (min, max) = hurtbox.0.aabb(pos.pos);
        let escaped = match actor.facing {
            Facing::Left => max.x < 0.0,
            Facing::Right => min.x > config.field.width,
        };
        if !escaped {
            continue;
        }
        if let Err(conflict) = esm.enter(EnemyState::Dormant, frame) {
            // Retried next tick; the enemy is still past the edge.
            report_conflict(&mut ctx, entity, conflict);
            continue;
        }
        ctx.misses += 1;
        debug!("{:?} escaped at x={} frame {}", entity, pos.pos.x, frame);
        combat.write(CombatEvent::Escaped { enemy: entity });
        cues.write(AudioCue::Escape);
    }
}
