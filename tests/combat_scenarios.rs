//! End-to-end combat scenarios driven through [`Engine::tick`].
//!
//! Timing reminders for the default geometry:
//! - a command pressed before tick `k` starts its attack on tick `k` with
//!   timer 0, so the attack's timer is `t` on tick `k + t`;
//! - an enemy placed on the field becomes hittable on the next tick.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;

use sidebrawl::autoplay::choose_command;
use sidebrawl::components::actor::Enemy;
use sidebrawl::components::actorstate::{
    AttackKind, EnemyState, EnemyStateMachine, PlayerState, PlayerStateMachine,
};
use sidebrawl::components::mapposition::MapPosition;
use sidebrawl::engine::Engine;
use sidebrawl::error::EngineError;
use sidebrawl::events::audio::AudioCue;
use sidebrawl::events::input::InputCommand;
use sidebrawl::events::score::{ScoreCause, ScoreEvent};
use sidebrawl::render::{RenderSnapshot, RenderSurface};
use sidebrawl::resources::combo::ComboTracker;
use sidebrawl::resources::feedback::FeedbackBus;
use sidebrawl::resources::gameconfig::GameConfig;
use sidebrawl::resources::roster::Roster;
use sidebrawl::resources::simcontext::SimulationContext;

/// One walker that stands still unless `speed` says otherwise.
fn single_walker(speed: f32) -> Roster {
    let mut roster = Roster::default();
    roster.enemies.truncate(1);
    roster.enemies[0].speed_base = speed;
    roster
}

fn engine_with(roster: Roster) -> Engine {
    Engine::new(GameConfig::new(), roster, 11).unwrap()
}

fn enemy_state(engine: &Engine, index: usize) -> EnemyState {
    let entity = engine.enemies()[index];
    engine.world().get::<EnemyStateMachine>(entity).unwrap().state()
}

fn enemy(engine: &Engine, index: usize) -> Enemy {
    let entity = engine.enemies()[index];
    engine.world().get::<Enemy>(entity).unwrap().clone()
}

fn enemy_x(engine: &Engine, index: usize) -> f32 {
    let entity = engine.enemies()[index];
    engine.world().get::<MapPosition>(entity).unwrap().pos.x
}

fn player_state(engine: &Engine) -> PlayerState {
    engine
        .world()
        .get::<PlayerStateMachine>(engine.player())
        .unwrap()
        .state()
}

fn score_reader(engine: &mut Engine) -> SystemState<MessageReader<'static, 'static, ScoreEvent>> {
    SystemState::new(engine.world_mut())
}

fn tick_collecting(
    engine: &mut Engine,
    reader: &mut SystemState<MessageReader<'static, 'static, ScoreEvent>>,
    out: &mut Vec<ScoreEvent>,
) {
    engine.tick();
    let mut scores = reader.get_mut(engine.world_mut());
    out.extend(scores.read().copied());
}

#[test]
fn primary_attack_lands_on_active_start() {
    let mut engine = engine_with(single_walker(0.0));
    let start = Roster::default().player.primary.hitbox.active_start;
    assert!(engine.place_enemy(0, 500.0));
    assert!(engine.press(InputCommand::AttackPrimary));

    for _ in 0..start {
        engine.tick();
        assert_eq!(enemy_state(&engine, 0), EnemyState::Approaching);
    }
    engine.tick();

    assert_eq!(engine.context().frame_count, u64::from(start) + 1);
    assert_eq!(enemy_state(&engine, 0), EnemyState::Staggered);
    assert_eq!(enemy(&engine, 0).hit_count, 1);
    assert_eq!(engine.world().resource::<ComboTracker>().count, 1);
    assert_eq!(engine.context().score, GameConfig::new().combo.hit_value);
    assert_eq!(player_state(&engine), PlayerState::Attacking(AttackKind::Primary));
}

#[test]
fn hit_freezes_the_simulation_for_hit_stop() {
    let mut engine = engine_with(single_walker(0.0));
    let start = Roster::default().player.primary.hitbox.active_start;
    let stop = GameConfig::new().feedback.hit_stop_hit;
    engine.place_enemy(0, 500.0);
    engine.press(InputCommand::AttackPrimary);
    for _ in 0..=start {
        engine.tick();
    }
    let frame = engine.context().frame_count;
    for _ in 0..stop {
        engine.tick();
        assert_eq!(engine.context().frame_count, frame);
        assert!(engine.snapshot().hit_stop);
    }
    engine.tick();
    assert_eq!(engine.context().frame_count, frame + 1);
}

#[test]
fn repeated_hits_kill_and_recycle_enemy() {
    let mut engine = engine_with(single_walker(0.0));
    let walker = single_walker(0.0).enemies[0].clone();
    let mut reader = score_reader(&mut engine);
    let mut scores = Vec::new();
    engine.place_enemy(0, 500.0);

    let mut dying_at = None;
    let mut dormant_at = None;
    for _ in 0..5000 {
        let walking = player_state(&engine) == PlayerState::Walking;
        if dying_at.is_none() && walking && enemy_state(&engine, 0) == EnemyState::Approaching {
            engine.press(InputCommand::AttackPrimary);
        }
        let before = enemy_state(&engine, 0);
        tick_collecting(&mut engine, &mut reader, &mut scores);
        let after = enemy_state(&engine, 0);
        let frame = engine.context().frame_count;
        if before != EnemyState::Dying && after == EnemyState::Dying {
            dying_at = Some(frame);
            assert_eq!(enemy(&engine, 0).hit_count, walker.death_threshold);
        }
        if before == EnemyState::Dying && after == EnemyState::Dormant {
            dormant_at = Some(frame);
        }
        if dormant_at.is_some() && after == EnemyState::Approaching {
            break;
        }
    }

    let dying_at = dying_at.unwrap();
    let dormant_at = dormant_at.unwrap();
    assert_eq!(dormant_at - dying_at, u64::from(walker.death_duration) + 1);
    assert_eq!(enemy_state(&engine, 0), EnemyState::Approaching);
    let respawned = enemy(&engine, 0);
    assert_eq!(respawned.hit_count, 0);
    assert_eq!(respawned.spawns, 2);
    assert!(enemy_x(&engine, 0) >= GameConfig::new().field.width);

    let kills = scores.iter().filter(|s| s.cause == ScoreCause::Kill).count();
    let hits = scores.iter().filter(|s| s.cause == ScoreCause::Hit).count();
    assert_eq!(kills, 1);
    assert_eq!(hits as u32, walker.death_threshold - 1);
    assert_eq!(engine.context().kills, 1);
}

#[test]
fn escape_breaks_combo_and_respawns_at_entry_edge() {
    let mut engine = engine_with(single_walker(20.0));
    {
        let world = engine.world_mut();
        let mut combo = world.resource_mut::<ComboTracker>();
        combo.count = 4;
        combo.decay_timer = 90;
    }
    let score = 100;
    engine.world_mut().resource_mut::<SimulationContext>().score = score;
    engine.place_enemy(0, 100.0);

    let mut escaped = false;
    for _ in 0..20 {
        engine.tick();
        if enemy_state(&engine, 0) == EnemyState::Dormant {
            escaped = true;
            break;
        }
    }
    assert!(escaped);
    assert_eq!(engine.world().resource::<ComboTracker>().count, 0);
    assert_eq!(engine.context().score, score);
    assert_eq!(engine.context().misses, 1);
    assert!(engine.drain_audio_cues().contains(&AudioCue::Escape));

    let mut respawned = false;
    for _ in 0..500 {
        engine.tick();
        if enemy_state(&engine, 0) == EnemyState::Approaching {
            respawned = true;
            break;
        }
    }
    assert!(respawned);
    assert!(enemy_x(&engine, 0) >= GameConfig::new().field.width);
}

#[test]
fn hit_stop_freezes_actors_but_feedback_ages() {
    let mut engine = engine_with(single_walker(2.0));
    engine.place_enemy(0, 700.0);
    let freeze = 5;
    {
        let mut bus = engine.world_mut().resource_mut::<FeedbackBus>();
        bus.hit_stop(freeze);
        bus.shake(6.0, 20);
    }

    for i in 1..=freeze {
        engine.tick();
        assert_eq!(engine.context().frame_count, 0);
        assert_eq!(enemy_x(&engine, 0), 700.0);
        let shake = engine
            .world()
            .resource::<FeedbackBus>()
            .current_shake()
            .unwrap();
        assert_eq!(shake.remaining, 20 - i);
    }

    engine.tick();
    assert_eq!(engine.context().frame_count, 1);
    assert!(enemy_x(&engine, 0) < 700.0);
}

/// Low attack against a victim that becomes hittable on `place_after`
/// ticks into the session.
fn low_attack_result(place_after: u32) -> (EnemyState, u32, Vec<AudioCue>) {
    let mut engine = engine_with(single_walker(0.0));
    engine.press(InputCommand::LowAction);
    for _ in 0..place_after {
        engine.tick();
    }
    assert!(engine.place_enemy(0, 490.0));
    engine.drain_audio_cues();
    engine.tick();
    (
        enemy_state(&engine, 0),
        enemy(&engine, 0).hit_count,
        engine.drain_audio_cues(),
    )
}

#[test]
fn parry_window_boundary() {
    let parry_end = Roster::default().player.low.hitbox.parry_end.unwrap();

    let (state, hits, cues) = low_attack_result(parry_end);
    assert_eq!(state, EnemyState::Dying);
    assert_eq!(hits, 0);
    assert!(cues.contains(&AudioCue::Parry));

    let (state, hits, cues) = low_attack_result(parry_end + 1);
    assert_eq!(state, EnemyState::Staggered);
    assert_eq!(hits, 1);
    assert!(cues.contains(&AudioCue::Hit));
}

#[test]
fn autoplay_session_keeps_hit_counts_consistent() {
    let roster = Roster::default();
    let mut engine = engine_with(roster.clone());
    let count = engine.enemies().len();
    let mut last: Vec<(u32, u32)> = (0..count)
        .map(|i| {
            let e = enemy(&engine, i);
            (e.spawns, e.hit_count)
        })
        .collect();

    for _ in 0..6000 {
        let snapshot = engine.snapshot();
        if let Some(command) = choose_command(&snapshot, &roster) {
            engine.press(command);
        }
        engine.tick();
        for (i, previous) in last.iter_mut().enumerate() {
            let e = enemy(&engine, i);
            assert!(e.hit_count <= roster.enemies[i].death_threshold);
            if e.spawns == previous.0 {
                assert!(e.hit_count >= previous.1);
            } else {
                assert!(e.spawns > previous.0);
            }
            *previous = (e.spawns, e.hit_count);
        }
        assert!(engine.context().score >= 0);
    }
    assert!(engine.context().difficulty > 1.0);
}

#[test]
fn command_is_reported_as_swing_cue() {
    let mut engine = engine_with(single_walker(0.0));
    engine.press(InputCommand::AttackSecondary);
    engine.tick();
    assert_eq!(engine.drain_audio_cues(), vec![AudioCue::Swing]);
    assert!(engine.drain_audio_cues().is_empty());
}

#[test]
fn second_press_before_tick_is_dropped() {
    let mut engine = engine_with(single_walker(0.0));
    assert!(engine.press(InputCommand::AttackPrimary));
    assert!(!engine.press(InputCommand::AttackSecondary));
    engine.tick();
    assert_eq!(
        player_state(&engine),
        PlayerState::Attacking(AttackKind::Primary)
    );
}

#[test]
fn invalid_roster_is_rejected() {
    let mut roster = Roster::default();
    roster.enemies.clear();
    let result = Engine::new(GameConfig::new(), roster, 1);
    assert!(matches!(result, Err(EngineError::InvalidRoster(_))));
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = GameConfig::new();
    config.field.width = 0.0;
    let result = Engine::new(config, Roster::default(), 1);
    assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
}

#[test]
fn zero_combo_window_is_rejected() {
    let mut config = GameConfig::new();
    config.combo.window = 0;
    let result = Engine::new(config, Roster::default(), 1);
    assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
}

#[test]
fn initial_enemy_speed_respects_speed_max() {
    let speed_max = GameConfig::new().spawn.speed_max;
    let engine = engine_with(single_walker(speed_max * 4.0));
    let walker = enemy(&engine, 0);
    assert_eq!(walker.speed_base, speed_max * 4.0);
    assert_eq!(walker.speed_current, speed_max);
}

struct BrokenSurface;

impl RenderSurface for BrokenSurface {
    fn open(&mut self) -> Result<(), String> {
        Err("no display".into())
    }

    fn present(&mut self, _snapshot: &RenderSnapshot) -> Result<(), String> {
        Ok(())
    }
}

#[test]
fn surface_that_cannot_open_is_reported() {
    let mut engine = engine_with(single_walker(0.0));
    let result = engine.attach_surface(Box::new(BrokenSurface));
    assert_eq!(
        result,
        Err(EngineError::SurfaceUnavailable("no display".into()))
    );
}
