//! Combo decay and scoring of combat events.
use bevy_ecs::prelude::*;
use log::debug;

use crate::events::combat::CombatEvent;
use crate::events::score::{ScoreCause, ScoreEvent};
use crate::resources::combo::ComboTracker;
use crate::resources::gameconfig::GameConfig;
use crate::resources::roster::HitKind;
use crate::resources::simcontext::SimulationContext;

/// One tick of combo decay. Runs before hit resolution, so the tick that
/// lands a hit starts a full window.
pub fn decay_combo(mut combo: ResMut<ComboTracker>) {
    if combo.tick_decay() {
        debug!("combo expired");
    }
}

/// Turn combat events into score changes and combo updates.
///
/// - A player hit counts toward the combo and scores under its multiplier.
/// - The player getting hit resets the combo and applies the penalty.
/// - An escaped enemy resets the combo without touching the score.
pub fn score_combat_events(
    config: Res<GameConfig>,
    mut ctx: ResMut<SimulationContext>,
    mut combo: ResMut<ComboTracker>,
    mut reader: MessageReader<CombatEvent>,
    mut scores: MessageWriter<ScoreEvent>,
) {
    let rules = &config.combo;
    for event in reader.read() {
        match *event {
            CombatEvent::Hit {
                kind, lethal, at, ..
            } => {
                let value = match kind {
                    HitKind::Normal => rules.hit_value,
                    HitKind::Parry => rules.parry_value,
                };
                let delta = combo.register_hit(rules, value, lethal);
                ctx.add_score(delta);
                let cause = match (kind, lethal) {
                    (HitKind::Parry, _) => ScoreCause::Parry,
                    (HitKind::Normal, true) => ScoreCause::Kill,
                    (HitKind::Normal, false) => ScoreCause::Hit,
                };
                scores.write(ScoreEvent { delta, at, cause });
            }
            CombatEvent::PlayerHit { at, .. } => {
                combo.reset();
                let delta = -rules.player_hit_penalty;
                ctx.add_score(delta);
                scores.write(ScoreEvent {
                    delta,
                    at,
                    cause: ScoreCause::PlayerHit,
                });
            }
            CombatEvent::Escaped { enemy } => {
                debug!("{:?} escaped; combo {} lost", enemy, combo.count);
                combo.reset();
            }
        }
    }
}
