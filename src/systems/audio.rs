//! Audio cue delivery on a dedicated thread.
//!
//! - [`audio_thread`] runs on its own OS thread, owns the [`AudioBackend`],
//!   and plays every [`AudioCmd::Play`] it receives, answering with
//!   [`AudioMessage`]s.
//! - [`forward_audio_cues`] sends each tick's [`AudioCue`] messages to the
//!   thread through the [`AudioBridge`].
//! - [`poll_audio_messages`] drains the thread's answers without blocking
//!   and logs cues that could not be played.
//!
//! A cue whose sound is unavailable is a no-op for the simulation; the
//! failure is only logged.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::events::audio::{AudioCmd, AudioCue, AudioMessage};
use crate::resources::assets::{AssetKind, AssetStore};
use crate::resources::audio::AudioBridge;

/// Playback device seam. Implementations live on the audio thread only.
pub trait AudioBackend: Send + 'static {
    fn play(&mut self, id: &str) -> Result<(), String>;
}

/// Backend that accepts every cue whose sound finished loading and rejects
/// the rest.
#[derive(Debug, Default)]
pub struct AssetAudioBackend {
    available: FxHashSet<String>,
}

impl AssetAudioBackend {
    pub fn from_store(store: &AssetStore) -> Self {
        Self {
            available: store
                .ready_ids(AssetKind::Sound)
                .map(str::to_string)
                .collect(),
        }
    }
}

impl AudioBackend for AssetAudioBackend {
    fn play(&mut self, id: &str) -> Result<(), String> {
        if self.available.contains(id) {
            debug!("[audio] play '{}'", id);
            Ok(())
        } else {
            Err(format!("sound '{}' not loaded", id))
        }
    }
}

/// Entry point of the dedicated audio thread.
///
/// Blocks on the command channel until [`AudioCmd::Shutdown`] arrives or
/// every sender is gone.
pub fn audio_thread(
    rx_cmd: Receiver<AudioCmd>,
    tx_evt: Sender<AudioMessage>,
    mut backend: Box<dyn AudioBackend>,
) {
    debug!(
        "[audio] thread starting (id={:?})",
        std::thread::current().id()
    );
    while let Ok(cmd) = rx_cmd.recv() {
        match cmd {
            AudioCmd::Play(cue) => {
                let id = cue.asset_id();
                let msg = match backend.play(&id) {
                    Ok(()) => AudioMessage::CuePlayed { id },
                    Err(error) => AudioMessage::CueFailed { id, error },
                };
                let _ = tx_evt.send(msg);
            }
            AudioCmd::Shutdown => break,
        }
    }
    debug!("[audio] thread exiting");
}

/// Forward this tick's cues to the audio thread. Without a bridge the cues
/// are left for the host to drain.
pub fn forward_audio_cues(bridge: Option<Res<AudioBridge>>, mut reader: MessageReader<AudioCue>) {
    let Some(bridge) = bridge else {
        return;
    };
    for cue in reader.read() {
        // ignore send error on shutdown
        let _ = bridge.tx_cmd.send(AudioCmd::Play(*cue));
    }
}

/// Drain results from the audio thread into the ECS mailbox.
pub fn poll_audio_messages(
    bridge: Option<Res<AudioBridge>>,
    mut writer: MessageWriter<AudioMessage>,
) {
    let Some(bridge) = bridge else {
        return;
    };
    for msg in bridge.rx_msg.try_iter() {
        if let AudioMessage::CueFailed { id, error } = &msg {
            warn!("[audio] cue '{}' skipped: {}", id, error);
        }
        writer.write(msg);
    }
}

/// Advance the ECS message queue for [`AudioMessage`].
pub fn update_audio_messages(mut msgs: ResMut<Messages<AudioMessage>>) {
    msgs.update();
}
