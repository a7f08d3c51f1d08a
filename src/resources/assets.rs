//! Background asset loading with placeholder fallback.
//!
//! [`load_assets`] starts a loader thread and returns an [`AssetLoad`]
//! handle immediately. The driver calls [`AssetLoad::wait`] once before the
//! first tick; that is the only point the session blocks on I/O.
//!
//! Loading never fails as a whole. A file that cannot be read becomes an
//! [`AssetStatus::Placeholder`] entry, and a loader thread that dies yields a
//! store in which every manifest entry is a placeholder.

use log::{info, warn};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crate::components::actor::EnemyTypeId;
use crate::events::audio::AudioCue;
use crate::resources::roster::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Sound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub id: String,
    pub kind: AssetKind,
    /// Relative to the asset root.
    pub path: PathBuf,
}

/// List of assets a session wants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    pub entries: Vec<AssetEntry>,
}

impl AssetManifest {
    pub fn add(&mut self, id: impl Into<String>, kind: AssetKind, path: impl Into<PathBuf>) {
        self.entries.push(AssetEntry {
            id: id.into(),
            kind,
            path: path.into(),
        });
    }

    /// Images and sounds a roster needs: actor sheets, the backdrop, the
    /// fixed combat cues and every enemy vocalization.
    pub fn for_roster(roster: &Roster) -> Self {
        let mut manifest = Self::default();
        manifest.add("backdrop", AssetKind::Image, "textures/backdrop.png");
        manifest.add("player", AssetKind::Image, "textures/player.png");
        for cue in [
            AudioCue::Swing,
            AudioCue::Hit,
            AudioCue::Kill,
            AudioCue::Parry,
            AudioCue::PlayerHit,
            AudioCue::Escape,
        ] {
            let id = cue.asset_id();
            let path = format!("audio/{}.ogg", id);
            manifest.add(id, AssetKind::Sound, path);
        }
        for (index, enemy) in roster.enemies.iter().enumerate() {
            manifest.add(
                enemy.name.clone(),
                AssetKind::Image,
                format!("textures/{}.png", enemy.name),
            );
            for voice in 0..enemy.voices {
                let id = AudioCue::EnemyVoice {
                    enemy: EnemyTypeId(index),
                    index: voice,
                }
                .asset_id();
                let path = format!("audio/{}_{}.ogg", enemy.name, voice);
                manifest.add(id, AssetKind::Sound, path);
            }
        }
        manifest
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Ready { path: PathBuf, bytes: usize },
    Placeholder { reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    entries: FxHashMap<String, (AssetKind, AssetStatus)>,
}

impl AssetStore {
    pub fn insert(&mut self, id: impl Into<String>, kind: AssetKind, status: AssetStatus) {
        self.entries.insert(id.into(), (kind, status));
    }

    pub fn status(&self, id: &str) -> Option<&AssetStatus> {
        self.entries.get(id).map(|(_, s)| s)
    }

    pub fn is_ready(&self, id: &str) -> bool {
        matches!(self.status(id), Some(AssetStatus::Ready { .. }))
    }

    /// Ids of ready assets of one kind.
    pub fn ready_ids(&self, kind: AssetKind) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(move |(id, (k, s))| {
            (*k == kind && matches!(s, AssetStatus::Ready { .. })).then_some(id.as_str())
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn placeholder_count(&self) -> usize {
        self.entries
            .values()
            .filter(|(_, s)| matches!(s, AssetStatus::Placeholder { .. }))
            .count()
    }

    fn all_placeholders(manifest: &AssetManifest, reason: &str) -> Self {
        let mut store = Self::default();
        for entry in &manifest.entries {
            store.insert(
                entry.id.clone(),
                entry.kind,
                AssetStatus::Placeholder {
                    reason: reason.to_string(),
                },
            );
        }
        store
    }
}

/// Pending asset load.
pub struct AssetLoad {
    manifest: AssetManifest,
    handle: JoinHandle<AssetStore>,
}

impl AssetLoad {
    /// Block until the loader finishes.
    pub fn wait(self) -> AssetStore {
        let store = match self.handle.join() {
            Ok(store) => store,
            Err(_) => {
                warn!("Asset loader thread died; using placeholders for everything");
                AssetStore::all_placeholders(&self.manifest, "loader thread died")
            }
        };
        info!(
            "Assets ready: {} entries, {} placeholders",
            store.len(),
            store.placeholder_count()
        );
        store
    }
}

fn load_entry(root: &Path, entry: &AssetEntry) -> AssetStatus {
    let path = root.join(&entry.path);
    match std::fs::read(&path) {
        Ok(bytes) if !bytes.is_empty() => AssetStatus::Ready {
            path,
            bytes: bytes.len(),
        },
        Ok(_) => {
            warn!("Asset '{}' at {:?} is empty", entry.id, path);
            AssetStatus::Placeholder {
                reason: "empty file".into(),
            }
        }
        Err(e) => {
            warn!("Asset '{}' unavailable at {:?}: {}", entry.id, path, e);
            AssetStatus::Placeholder {
                reason: e.to_string(),
            }
        }
    }
}

/// Start loading `manifest` relative to `root` on a background thread.
pub fn load_assets(root: impl Into<PathBuf>, manifest: AssetManifest) -> AssetLoad {
    let root = root.into();
    let job = manifest.clone();
    let handle = std::thread::spawn(move || {
        let mut store = AssetStore::default();
        for entry in &job.entries {
            store.insert(entry.id.clone(), entry.kind, load_entry(&root, entry));
        }
        store
    });
    AssetLoad { manifest, handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sidebrawl_assets_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::create_dir_all(dir.join("audio"));
        dir
    }

    #[test]
    fn test_missing_files_become_placeholders() {
        let mut manifest = AssetManifest::default();
        manifest.add("hit", AssetKind::Sound, "audio/hit.ogg");
        let store = load_assets("/nonexistent/sidebrawl", manifest).wait();
        assert_eq!(store.len(), 1);
        assert!(!store.is_ready("hit"));
        assert_eq!(store.placeholder_count(), 1);
    }

    #[test]
    fn test_present_files_are_ready() {
        let root = temp_root("ready");
        std::fs::write(root.join("audio/hit.ogg"), b"OggS").unwrap();
        let mut manifest = AssetManifest::default();
        manifest.add("hit", AssetKind::Sound, "audio/hit.ogg");
        manifest.add("kill", AssetKind::Sound, "audio/kill.ogg");
        let store = load_assets(&root, manifest).wait();
        let _ = std::fs::remove_dir_all(&root);
        assert!(store.is_ready("hit"));
        assert!(!store.is_ready("kill"));
        let ready: Vec<&str> = store.ready_ids(AssetKind::Sound).collect();
        assert_eq!(ready, vec!["hit"]);
    }

    #[test]
    fn test_roster_manifest_covers_voices() {
        let roster = Roster::default();
        let manifest = AssetManifest::for_roster(&roster);
        let voices: u32 = roster.enemies.iter().map(|e| e.voices).sum();
        let sounds = manifest
            .entries
            .iter()
            .filter(|e| e.kind == AssetKind::Sound)
            .count();
        assert_eq!(sounds, 6 + voices as usize);
        assert!(manifest.entries.iter().any(|e| e.id == "voice_0_6"));
    }
}
