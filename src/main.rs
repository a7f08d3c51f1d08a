//! Sidebrawl headless runner.
//!
//! Runs a combat session without a window:
//! - **bevy_ecs** drives the per-tick simulation
//! - a background thread loads assets; missing files degrade to placeholders
//! - audio cues go to an audio thread that plays whatever finished loading
//! - frames are reported as log lines or as JSON lines on stdout
//!
//! # Main Loop
//!
//! 1. Load config (INI) and roster (JSON), falling back to defaults
//! 2. Wait for the asset loader once
//! 3. Build the engine, attach audio and the headless surface
//! 4. Tick `--ticks` times, feeding autoplay commands if requested
//! 5. Shut down the audio thread and log the session summary
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --ticks 3600 --autoplay
//! ```

use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

use sidebrawl::autoplay::choose_command;
use sidebrawl::engine::Engine;
use sidebrawl::render::{HeadlessMode, HeadlessSurface};
use sidebrawl::resources::assets::{AssetManifest, load_assets};
use sidebrawl::resources::gameconfig::GameConfig;
use sidebrawl::resources::roster::Roster;
use sidebrawl::systems::audio::AssetAudioBackend;

/// Sidebrawl headless combat runner
#[derive(Parser)]
#[command(version, about = "Runs a side-scrolling combat session without a display.")]
struct Cli {
    /// INI file with tuning values. Missing keys keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON roster with player and enemy archetypes.
    #[arg(long, value_name = "PATH")]
    roster: Option<PathBuf>,

    /// Asset root directory.
    #[arg(long, value_name = "DIR", default_value = "./assets")]
    assets: PathBuf,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Seed for gameplay randomness.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Let the built-in bot press attacks.
    #[arg(long)]
    autoplay: bool,

    /// Print one JSON snapshot per tick on stdout.
    #[arg(long)]
    json: bool,

    /// Ticks between log summaries when not printing JSON.
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = GameConfig::with_path(path);
            if let Err(e) = config.load_from_file() {
                warn!("{}; using defaults", e);
            }
            config
        }
        None => GameConfig::new(),
    };

    let roster = match &cli.roster {
        Some(path) => match Roster::load_from_file(path) {
            Ok(roster) => roster,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Roster::default(),
    };

    // Block once for assets before the first tick.
    let store = load_assets(&cli.assets, AssetManifest::for_roster(&roster)).wait();

    let mut engine = match Engine::new(config, roster.clone(), cli.seed) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    engine.attach_audio(Box::new(AssetAudioBackend::from_store(&store)));

    let mode = if cli.json {
        HeadlessMode::JsonLines
    } else {
        HeadlessMode::Log {
            every: cli.report_every,
        }
    };
    if let Err(e) = engine.attach_surface(Box::new(HeadlessSurface::new(mode))) {
        error!("{}", e);
        engine.shutdown();
        std::process::exit(1);
    }

    info!("Running {} ticks (autoplay: {})", cli.ticks, cli.autoplay);
    for _ in 0..cli.ticks {
        if cli.autoplay {
            let snapshot = engine.snapshot();
            if let Some(command) = choose_command(&snapshot, &roster) {
                engine.press(command);
            }
        }
        engine.tick();
    }

    engine.shutdown();
}
