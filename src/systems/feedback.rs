use bevy_ecs::prelude::*;

use crate::events::score::ScoreEvent;
use crate::resources::feedback::FeedbackBus;
use crate::resources::gameconfig::GameConfig;

/// Schedule shake, hit-stop and floating text for each score change.
pub fn notify_feedback(
    config: Res<GameConfig>,
    mut bus: ResMut<FeedbackBus>,
    mut reader: MessageReader<ScoreEvent>,
) {
    for event in reader.read() {
        bus.notify(event, &config.feedback);
    }
}

/// Age effects by one tick; runs on frozen ticks too.
pub fn age_feedback(mut bus: ResMut<FeedbackBus>) {
    bus.age();
}
