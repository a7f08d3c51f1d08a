//! Pending player command latched between ticks.
//!
//! The host calls [`InputLatch::press`] whenever a button goes down; the
//! next simulated tick consumes at most one command. Presses that arrive
//! while a command is already pending are dropped, not queued.
use bevy_ecs::prelude::*;

use crate::events::input::InputCommand;

#[derive(Resource, Debug, Clone, Default)]
pub struct InputLatch {
    pending: Option<InputCommand>,
    /// Presses dropped since the session started.
    pub dropped: u32,
}

impl InputLatch {
    /// Latch a command. Returns false if another one was already pending.
    pub fn press(&mut self, command: InputCommand) -> bool {
        if self.pending.is_some() {
            self.dropped += 1;
            return false;
        }
        self.pending = Some(command);
        true
    }

    pub fn pending(&self) -> Option<InputCommand> {
        self.pending
    }

    pub fn take(&mut self) -> Option<InputCommand> {
        self.pending.take()
    }
}
