//! Scripted input for unattended runs.
//!
//! Looks at the latest snapshot and presses the attack whose hitbox already
//! covers an approaching enemy. Good enough to exercise every system in a
//! headless session; it never parries on purpose.

use crate::components::actor::{ActorKind, Facing};
use crate::components::actorstate::{AttackKind, EnemyState, PlayerState};
use crate::events::input::InputCommand;
use crate::render::{ActorStateView, RenderSnapshot};
use crate::resources::roster::Roster;

pub fn choose_command(snapshot: &RenderSnapshot, roster: &Roster) -> Option<InputCommand> {
    let player = snapshot
        .actors
        .iter()
        .find(|a| a.kind == ActorKind::Player)?;
    if player.state != ActorStateView::Player(PlayerState::Walking) {
        return None;
    }
    let options = [
        (InputCommand::AttackPrimary, AttackKind::Primary, Facing::Right),
        (InputCommand::AttackSecondary, AttackKind::Secondary, Facing::Left),
    ];
    for enemy in &snapshot.actors {
        if enemy.state != ActorStateView::Enemy(EnemyState::Approaching) {
            continue;
        }
        let Some(hurtbox) = roster.hurtbox(enemy.kind) else {
            continue;
        };
        for (command, kind, facing) in options {
            let hitbox = roster.player.action(kind).hitbox.collider().mirrored(facing);
            if hitbox.overlaps(player.position, &hurtbox, enemy.position) {
                return Some(command);
            }
        }
    }
    None
}
