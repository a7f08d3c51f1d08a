//! Enemy activation and respawn.
//!
//! Enemy instances are created once and recycled: an instance in `Dormant`
//! is brought back to `Approaching` at its entry edge when its type's spawn
//! slot comes due. See [`crate::resources::spawn`] for the cooldown rules.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;
use smallvec::SmallVec;

use crate::components::actor::{Actor, AnimClock, Enemy, EnemyTypeId};
use crate::components::actorstate::{EnemyState, EnemyStateMachine};
use crate::components::mapposition::MapPosition;
use crate::resources::gameconfig::GameConfig;
use crate::resources::roster::{Roster, Side};
use crate::resources::simcontext::SimulationContext;
use crate::resources::simrng::SimRng;
use crate::resources::spawn::{SpawnScheduler, resolve_spawn_x};
use crate::systems::actors::report_conflict;

pub fn schedule_spawns(
    roster: Res<Roster>,
    config: Res<GameConfig>,
    mut ctx: ResMut<SimulationContext>,
    mut scheduler: ResMut<SpawnScheduler>,
    mut rng: ResMut<SimRng>,
    mut enemies: Query<(
        Entity,
        &mut Enemy,
        &mut EnemyStateMachine,
        &mut Actor,
        &mut MapPosition,
        &mut AnimClock,
    )>,
) {
    let frame = ctx.frame_count;
    let mut occupied: SmallVec<[f32; 8]> = enemies
        .iter()
        .filter(|(_, _, sm, ..)| sm.state() != EnemyState::Dormant)
        .map(|(.., pos, _)| pos.pos.x)
        .collect();

    for (index, archetype) in roster.enemies.iter().enumerate() {
        let type_id = EnemyTypeId(index);
        if ctx.difficulty < archetype.unlock_difficulty {
            continue;
        }
        let mut active = false;
        let mut dormant = None;
        for (entity, enemy, sm, ..) in enemies.iter() {
            if enemy.type_id != type_id {
                continue;
            }
            if sm.state() == EnemyState::Dormant {
                if dormant.is_none() && !sm.changed_on(frame) {
                    dormant = Some(entity);
                }
            } else {
                active = true;
            }
        }
        if active {
            continue;
        }
        let Some(entity) = dormant else {
            continue;
        };
        let interval = archetype.spawn.interval(ctx.difficulty);
        if !scheduler.tick_slot(index, interval) {
            continue;
        }

        let Ok((_, mut enemy, mut sm, mut actor, mut pos, mut anim)) = enemies.get_mut(entity)
        else {
            continue;
        };
        if let Err(conflict) = sm.enter(EnemyState::Approaching, frame) {
            report_conflict(&mut ctx, entity, conflict);
            continue;
        }

        let jitter = rng.0.f32() * config.spawn.jitter.max(0.0);
        let candidate = match archetype.side {
            Side::Right => config.field.width + jitter,
            Side::Left => -jitter,
        };
        let x = resolve_spawn_x(candidate, &occupied, config.spawn.min_gap, archetype.side);

        if enemy.spawns > 0 {
            enemy.speed_base =
                (enemy.speed_base + config.spawn.speed_step).min(config.spawn.speed_max);
        }
        enemy.spawns += 1;
        enemy.hit_count = 0;
        enemy.struck_player = false;
        enemy.speed_current = (enemy.speed_base * ctx.difficulty).min(config.spawn.speed_max);
        actor.facing = archetype.side.approach_facing();
        pos.pos = Vec2::new(x, config.field.ground_y);
        anim.reset();
        occupied.push(x);

        debug!(
            "spawned {} #{} ({:?}) at x={} speed={} interval={}",
            archetype.name, enemy.spawns, entity, x, enemy.speed_current, interval
        );
    }
}
