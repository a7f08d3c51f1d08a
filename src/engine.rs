//! Session driver: owns the `World`, the update schedule and the collaborators.
//!
//! One call to [`Engine::tick`] is one display refresh:
//!
//! 1. `hit_stop_gate` decides whether the tick is frozen.
//! 2. Unless frozen: clock, actor updates, input, animation, backdrop, combo
//!    decay, the three hit-resolution passes, spawning and scoring, in that
//!    order.
//! 3. Always: feedback aging and notification, audio forwarding, message
//!    queue maintenance.
//! 4. The snapshot is presented to the attached surface, if any.
//!
//! Nothing outside a tick mutates simulation state except
//! [`Engine::press`], which only latches a command for the next tick.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;
use glam::Vec2;
use log::{info, warn};

use crate::components::actor::{
    Actor, ActorKind, AnimClock, Enemy, EnemyTypeId, Facing, Player,
};
use crate::components::actorstate::{
    EnemyState, EnemyStateMachine, PlayerState, PlayerStateMachine,
};
use crate::components::boxcollider::{ContactBox, Hurtbox};
use crate::components::mapposition::MapPosition;
use crate::error::EngineError;
use crate::events::audio::{AudioCue, AudioMessage};
use crate::events::combat::CombatEvent;
use crate::events::input::InputCommand;
use crate::events::score::ScoreEvent;
use crate::render::{RenderSnapshot, RenderSurface};
use crate::resources::audio::{setup_audio, shutdown_audio};
use crate::resources::backdrop::Backdrop;
use crate::resources::combo::ComboTracker;
use crate::resources::feedback::FeedbackBus;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputLatch;
use crate::resources::roster::{Roster, Side};
use crate::resources::simcontext::SimulationContext;
use crate::resources::simrng::SimRng;
use crate::resources::spawn::SpawnScheduler;
use crate::systems::actors::{
    advance_enemies, advance_player, animate_actors, consume_player_input,
};
use crate::systems::audio::{
    AudioBackend, forward_audio_cues, poll_audio_messages, update_audio_messages,
};
use crate::systems::backdrop::scroll_backdrop;
use crate::systems::clock::{advance_clock, hit_stop_gate, simulation_running};
use crate::systems::combo::{decay_combo, score_combat_events};
use crate::systems::feedback::{age_feedback, notify_feedback};
use crate::systems::hitresolve::{
    detect_escapes, resolve_enemy_contacts, resolve_player_attacks,
};
use crate::systems::messages::update_combat_messages;
use crate::systems::spawn::schedule_spawns;

/// Mixed into the session seed for the presentation RNG.
const FEEDBACK_SEED_SALT: u64 = 0x5eed_fb00_5eed_fb00;

/// Build the per-tick schedule.
pub fn build_update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(hit_stop_gate);
    update.add_systems(
        (
            advance_clock,
            advance_player,
            consume_player_input,
            advance_enemies,
            animate_actors,
            scroll_backdrop,
            decay_combo,
            resolve_player_attacks,
            resolve_enemy_contacts,
            detect_escapes,
            schedule_spawns,
            score_combat_events,
        )
            .chain()
            .run_if(simulation_running)
            .after(hit_stop_gate),
    );
    update.add_systems(
        (
            age_feedback,
            notify_feedback,
            forward_audio_cues,
            poll_audio_messages,
            update_audio_messages,
            update_combat_messages,
        )
            .chain()
            .after(score_combat_events),
    );
    update
}

pub struct Engine {
    world: World,
    update: Schedule,
    cue_reader: SystemState<MessageReader<'static, 'static, AudioCue>>,
    surface: Option<Box<dyn RenderSurface>>,
    player: Entity,
    enemies: Vec<Entity>,
}

impl Engine {
    /// Validate the configuration, build the world and spawn every actor:
    /// the player plus one dormant instance per enemy type.
    pub fn new(config: GameConfig, roster: Roster, seed: u64) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::InvalidConfig)?;
        roster.validate().map_err(EngineError::InvalidRoster)?;

        let mut world = World::new();
        world.insert_resource(SimulationContext::default());
        world.insert_resource(ComboTracker::default());
        world.insert_resource(FeedbackBus::with_seed(seed ^ FEEDBACK_SEED_SALT));
        world.insert_resource(SpawnScheduler::new(roster.enemies.len()));
        world.insert_resource(InputLatch::default());
        world.insert_resource(SimRng::with_seed(seed));
        world.insert_resource(Backdrop::default());
        world.init_resource::<Messages<CombatEvent>>();
        world.init_resource::<Messages<ScoreEvent>>();
        world.init_resource::<Messages<AudioCue>>();
        world.init_resource::<Messages<AudioMessage>>();

        let player = world
            .spawn((
                Actor::new(ActorKind::Player, Facing::Right),
                Player::default(),
                PlayerStateMachine::new(PlayerState::Walking),
                MapPosition::new(config.field.player_x, config.field.ground_y),
                Hurtbox(roster.player.hurtbox.collider()),
                AnimClock::default(),
            ))
            .id();

        let mut enemies = Vec::with_capacity(roster.enemies.len());
        for (index, archetype) in roster.enemies.iter().enumerate() {
            let parked_x = match archetype.side {
                Side::Right => config.field.width,
                Side::Left => 0.0,
            };
            let mut enemy = Enemy::new(EnemyTypeId(index), archetype.speed_base);
            enemy.speed_current = enemy.speed_current.min(config.spawn.speed_max);
            let entity = world
                .spawn((
                    Actor::new(
                        ActorKind::Enemy(EnemyTypeId(index)),
                        archetype.side.approach_facing(),
                    ),
                    enemy,
                    EnemyStateMachine::new(EnemyState::Dormant),
                    MapPosition::new(parked_x, config.field.ground_y),
                    Hurtbox(archetype.hurtbox.collider()),
                    ContactBox(archetype.contact.collider()),
                    AnimClock::default(),
                ))
                .id();
            enemies.push(entity);
        }

        info!(
            "Session ready: {} enemy types, seed {}, field width {}",
            roster.enemies.len(),
            seed,
            config.field.width
        );
        world.insert_resource(config);
        world.insert_resource(roster);

        let mut update = build_update_schedule();
        update
            .initialize(&mut world)
            .map_err(|e| EngineError::Schedule(format!("{:?}", e)))?;
        let cue_reader = SystemState::new(&mut world);

        Ok(Self {
            world,
            update,
            cue_reader,
            surface: None,
            player,
            enemies,
        })
    }

    /// Open `surface` and present to it after every tick.
    pub fn attach_surface(
        &mut self,
        mut surface: Box<dyn RenderSurface>,
    ) -> Result<(), EngineError> {
        surface.open().map_err(EngineError::SurfaceUnavailable)?;
        self.surface = Some(surface);
        Ok(())
    }

    /// Start the audio thread around `backend`. On failure the session
    /// continues silently.
    pub fn attach_audio(&mut self, backend: Box<dyn AudioBackend>) {
        if let Err(e) = setup_audio(&mut self.world, backend) {
            warn!("{}; running without audio", e);
        }
    }

    /// Latch a command for the next tick. Returns false if dropped.
    pub fn press(&mut self, command: InputCommand) -> bool {
        self.world.resource_mut::<InputLatch>().press(command)
    }

    pub fn tick(&mut self) {
        self.update.run(&mut self.world);
        self.world.clear_trackers();
        if let Some(surface) = self.surface.as_mut() {
            let snapshot = RenderSnapshot::capture(&mut self.world);
            if let Err(e) = surface.present(&snapshot) {
                warn!("present failed at frame {}: {}", snapshot.frame, e);
            }
        }
    }

    pub fn snapshot(&mut self) -> RenderSnapshot {
        RenderSnapshot::capture(&mut self.world)
    }

    /// Cues emitted since the last drain, for hosts without an audio thread.
    pub fn drain_audio_cues(&mut self) -> Vec<AudioCue> {
        let mut reader = self.cue_reader.get_mut(&mut self.world);
        reader.read().copied().collect()
    }

    /// Put the dormant instance of enemy type `index` on the field at `x`,
    /// bypassing the spawn scheduler. Used for scripted openings.
    pub fn place_enemy(&mut self, index: usize, x: f32) -> bool {
        let Some(&entity) = self.enemies.get(index) else {
            return false;
        };
        let frame = self.world.resource::<SimulationContext>().frame_count;
        let ground = self.world.resource::<GameConfig>().field.ground_y;
        let Some(mut sm) = self.world.get_mut::<EnemyStateMachine>(entity) else {
            return false;
        };
        if sm.state() != EnemyState::Dormant || sm.enter(EnemyState::Approaching, frame).is_err() {
            return false;
        }
        if let Some(mut pos) = self.world.get_mut::<MapPosition>(entity) {
            pos.pos = Vec2::new(x, ground);
        }
        if let Some(mut enemy) = self.world.get_mut::<Enemy>(entity) {
            enemy.spawns += 1;
            enemy.hit_count = 0;
            enemy.struck_player = false;
        }
        true
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    /// Enemy entities, indexed like the roster's enemy list.
    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn context(&self) -> &SimulationContext {
        self.world.resource::<SimulationContext>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Stop collaborators and log the session summary.
    pub fn shutdown(mut self) {
        shutdown_audio(&mut self.world);
        let ctx = self.world.resource::<SimulationContext>();
        let best = self.world.resource::<ComboTracker>().best;
        info!(
            "Session over after {} frames: score {}, kills {}, misses {}, player hits {}, best combo {}, violations {}",
            ctx.frame_count,
            ctx.score,
            ctx.kills,
            ctx.misses,
            ctx.player_hits,
            best,
            ctx.invariant_violations
        );
    }
}
