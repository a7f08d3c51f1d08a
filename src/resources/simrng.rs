use bevy_ecs::prelude::Resource;

/// Gameplay randomness: attack variants and spawn jitter.
///
/// Seeded once per session so a run with the same inputs replays exactly.
#[derive(Resource, Debug)]
pub struct SimRng(pub fastrand::Rng);

impl SimRng {
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}
