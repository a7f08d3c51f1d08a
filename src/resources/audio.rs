//! Channel bridge to the audio thread.
//!
//! [`setup_audio`] starts a thread named `sidebrawl-audio` around an
//! [`AudioBackend`] and stores both channel ends in an [`AudioBridge`].
//! [`shutdown_audio`] stops and joins it. Without a bridge the cue systems
//! are no-ops, so a session runs silently when audio never came up.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{info, warn};
use std::thread::JoinHandle;

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::systems::audio::{AudioBackend, audio_thread};

#[derive(Resource)]
pub struct AudioBridge {
    /// Cue playback requests, main thread to audio thread.
    pub tx_cmd: Sender<AudioCmd>,
    /// Playback outcomes coming back.
    pub rx_msg: Receiver<AudioMessage>,
    pub handle: JoinHandle<()>,
}

pub fn setup_audio(world: &mut World, backend: Box<dyn AudioBackend>) -> Result<(), String> {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let handle = std::thread::Builder::new()
        .name("sidebrawl-audio".into())
        .spawn(move || audio_thread(rx_cmd, tx_msg, backend))
        .map_err(|e| format!("Failed to start audio thread: {}", e))?;

    if !world.contains_resource::<Messages<AudioMessage>>() {
        world.init_resource::<Messages<AudioMessage>>();
    }
    world.insert_resource(AudioBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
    info!("Audio thread started");
    Ok(())
}

/// Send [`AudioCmd::Shutdown`] and join the thread. Does nothing when audio
/// was never started.
pub fn shutdown_audio(world: &mut World) {
    let Some(bridge) = world.remove_resource::<AudioBridge>() else {
        return;
    };
    if bridge.tx_cmd.send(AudioCmd::Shutdown).is_err() {
        warn!("audio thread already gone at shutdown");
    }
    if bridge.handle.join().is_err() {
        warn!("audio thread panicked");
    }
}
