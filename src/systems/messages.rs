//! Message queue maintenance.
//!
//! `Messages<T>` must be updated once per tick so that messages written this
//! tick stay readable through the next one and then drop. Runs last.
use bevy_ecs::prelude::*;

use crate::events::audio::AudioCue;
use crate::events::combat::CombatEvent;
use crate::events::score::ScoreEvent;

pub fn update_combat_messages(
    mut combat: ResMut<Messages<CombatEvent>>,
    mut scores: ResMut<Messages<ScoreEvent>>,
    mut cues: ResMut<Messages<AudioCue>>,
) {
    combat.update();
    scores.update();
    cues.update();
}
