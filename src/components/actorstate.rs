//! Tick-driven state machines for actors.
//!
//! Each actor type has a single exhaustive state enum ([`PlayerState`],
//! [`EnemyState`]) wrapped in a [`StateMachine`] component. The transition
//! table is [`TimedState::timeout`]: for every timed state it names the
//! duration in ticks and the state entered once that duration is exceeded.
//! Steady states (`Walking`, `Approaching`, `Dormant`) have no timeout and
//! only leave through an external event (input, hit, spawn).
//!
//! # Timer semantics
//!
//! - Entering a state sets `timer` to 0 on the entering tick.
//! - [`StateMachine::advance`] adds 1 per update.
//! - A timed state reverts on the update where `timer` would exceed its
//!   duration; there is no early cancel.
//!
//! # One transition per tick
//!
//! The machine remembers the frame of its last transition. A second
//! [`StateMachine::enter`] in the same frame is refused with a
//! [`TransitionConflict`] so two rules can never fire ambiguously on one
//! actor in one tick.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::resources::roster::{EnemyArchetype, PlayerArchetype};

/// Player attack variants. Collision geometry comes from the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// Strike to the right.
    Primary,
    /// Strike to the left.
    Secondary,
    /// Low strike / parry attempt.
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Walking,
    Attacking(AttackKind),
    Staggered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyState {
    /// Recycled and waiting for the spawn scheduler.
    #[default]
    Dormant,
    Approaching,
    Staggered,
    Dying,
}

/// A state enum with a fixed transition table.
pub trait TimedState: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Configuration record the durations are read from.
    type Timings;

    /// `Some((duration, next))` for timed states, `None` for steady ones.
    fn timeout(&self, timings: &Self::Timings) -> Option<(u32, Self)>;
}

impl TimedState for PlayerState {
    type Timings = PlayerArchetype;

    fn timeout(&self, timings: &PlayerArchetype) -> Option<(u32, Self)> {
        match self {
            PlayerState::Walking => None,
            PlayerState::Attacking(kind) => {
                Some((timings.action(*kind).duration, PlayerState::Walking))
            }
            PlayerState::Staggered => Some((timings.stagger_duration, PlayerState::Walking)),
        }
    }
}

impl TimedState for EnemyState {
    type Timings = EnemyArchetype;

    fn timeout(&self, timings: &EnemyArchetype) -> Option<(u32, Self)> {
        match self {
            EnemyState::Dormant | EnemyState::Approaching => None,
            EnemyState::Staggered => Some((timings.stagger_duration, EnemyState::Approaching)),
            EnemyState::Dying => Some((timings.death_duration, EnemyState::Dormant)),
        }
    }
}

/// A transition refused because the actor already changed state this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionConflict<S> {
    pub current: S,
    pub requested: S,
    pub frame: u64,
}

impl<S: fmt::Debug> fmt::Display for TransitionConflict<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "second transition {:?} -> {:?} requested in frame {}",
            self.current, self.requested, self.frame
        )
    }
}

/// State plus `stateTimer` for one actor.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct StateMachine<S: TimedState> {
    state: S,
    timer: u32,
    changed_at: Option<u64>,
}

pub type PlayerStateMachine = StateMachine<PlayerState>;
pub type EnemyStateMachine = StateMachine<EnemyState>;

impl<S: TimedState> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            timer: 0,
            changed_at: None,
        }
    }

    pub fn state(&self) -> S {
        self.state
    }

    /// Ticks elapsed in the current state.
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Whether a transition already happened during `frame`.
    pub fn changed_on(&self, frame: u64) -> bool {
        self.changed_at == Some(frame)
    }

    /// Enter `next`, resetting the timer. Returns the previous state.
    pub fn enter(&mut self, next: S, frame: u64) -> Result<S, TransitionConflict<S>> {
        if self.changed_on(frame) {
            return Err(TransitionConflict {
                current: self.state,
                requested: next,
                frame,
            });
        }
        let previous = std::mem::replace(&mut self.state, next);
        self.timer = 0;
        self.changed_at = Some(frame);
        Ok(previous)
    }

    /// One update: bump the timer and apply the timeout rule.
    ///
    /// Returns `Some(previous)` when the state reverted this update.
    pub fn advance(&mut self, timings: &S::Timings, frame: u64) -> Option<S> {
        if self.changed_on(frame) {
            return None;
        }
        self.timer = self.timer.saturating_add(1);
        match self.state.timeout(timings) {
            Some((duration, next)) if self.timer > duration => self.enter(next, frame).ok(),
            _ => None,
        }
    }
}
