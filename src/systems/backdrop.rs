use bevy_ecs::prelude::*;

use crate::resources::backdrop::Backdrop;
use crate::resources::gameconfig::GameConfig;
use crate::resources::simcontext::SimulationContext;

/// Scroll the background at the current global speed.
pub fn scroll_backdrop(
    config: Res<GameConfig>,
    ctx: Res<SimulationContext>,
    mut backdrop: ResMut<Backdrop>,
) {
    backdrop.scroll(ctx.difficulty, config.field.width);
}
