// scene-preview - Run a wallpaper scene headlessly
//
// Pipeline:
//   1. Load the scene profile (RON file, or the built-in defaults)
//   2. Build the scene and step it N frames, 16 ms apart
//   3. Summarize the recorded draw stream
//   4. Fall scene only: dump the final height grid as a PNG
//
// Usage: cargo run --bin scene-preview -- --scene fall [--profile drift.ron] [--frames 120]

mod heightmap;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use ripple_engine::config::{FallProfile, GalaxyProfile, GrassProfile, NexusProfile};
use ripple_engine::error::ConfigError;
use ripple_engine::render::{Command, CommandLog};
use ripple_engine::scene::{
    FallScene, FrameDelay, FrameState, GalaxyScene, GrassScene, NexusScene, Scene,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

const FRAME_MS: f64 = 16.0;

#[derive(Debug, Error)]
enum PreviewError {
    #[error("invalid scene configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("could not parse profile: {0}")]
    Profile(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SceneKind {
    Fall,
    Nexus,
    Grass,
    Galaxy,
}

#[derive(Parser)]
#[command(name = "scene-preview")]
#[command(
    about = "Step a wallpaper scene without a GPU and report what it drew",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[arg(long, value_enum, default_value = "fall")]
    scene: SceneKind,

    /// Scene profile in RON; missing fields take their defaults
    #[arg(long)]
    profile: Option<PathBuf>,

    #[arg(long, default_value = "480")]
    width: u32,

    #[arg(long, default_value = "800")]
    height: u32,

    #[arg(long, default_value = "120")]
    frames: u32,

    #[arg(long, default_value = "1")]
    seed: u64,

    /// Render as a thumbnail (no intro, constant rain)
    #[arg(long)]
    preview: bool,

    /// Where to write the fall scene's final height grid
    #[arg(long)]
    heightmap: Option<PathBuf>,
}

/// What a run drew, summed over every frame.
#[derive(Debug, Default)]
struct Summary {
    frames: u32,
    draws: usize,
    uploaded: usize,
    by_kind: BTreeMap<&'static str, usize>,
    last_delay: Option<FrameDelay>,
}

impl Summary {
    fn record(&mut self, log: &CommandLog, delay: FrameDelay) {
        self.frames += 1;
        self.draws += log.draw_count();
        self.uploaded += log.uploaded_bytes();
        for command in &log.commands {
            *self.by_kind.entry(kind(command)).or_default() += 1;
        }
        self.last_delay = Some(delay);
    }
}

fn kind(command: &Command) -> &'static str {
    match command {
        Command::BindProgram(..) => "program",
        Command::BindTexture(..) => "texture",
        Command::Color(_) => "color",
        Command::ModelMatrix(_) => "model",
        Command::TextureMatrix(_) => "texture-matrix",
        Command::Material(_) => "material",
        Command::Quad(_) => "quad",
        Command::Rect(..) => "rect",
        Command::Mesh(_) => "mesh",
        Command::MeshRange(..) => "mesh-range",
        Command::Upload(..) => "upload",
        Command::Indices(..) => "indices",
    }
}

fn load_profile<P: DeserializeOwned + Default>(path: Option<&Path>) -> Result<P, PreviewError> {
    match path {
        Some(path) => {
            log::info!("  Loading profile {}...", path.display());
            let text = fs::read_to_string(path)?;
            Ok(ron::from_str(&text)?)
        }
        None => Ok(P::default()),
    }
}

fn step<S: Scene>(scene: &mut S, cli: &Cli) -> Summary {
    let mut state = FrameState::new(cli.width, cli.height);
    state.preview = cli.preview;
    let mut log = CommandLog::new();
    let mut summary = Summary::default();

    for frame in 0..cli.frames {
        log.clear();
        state.now_ms = frame as f64 * FRAME_MS;
        let delay = scene.frame(&mut state, &mut log);
        summary.record(&log, delay);
    }
    summary
}

fn run(cli: &Cli) -> Result<Summary, PreviewError> {
    let profile = cli.profile.as_deref();
    log::info!(
        "Running {:?} at {}x{} for {} frames...",
        cli.scene,
        cli.width,
        cli.height,
        cli.frames
    );

    let summary = match cli.scene {
        SceneKind::Fall => {
            let profile: FallProfile = load_profile(profile)?;
            let mut scene = FallScene::new(profile, cli.width, cli.height, cli.seed)?;
            let summary = step(&mut scene, cli);
            if let Some(path) = &cli.heightmap {
                log::info!("  Writing height grid to {}...", path.display());
                heightmap::write(scene.height_grid(), path)?;
            }
            summary
        }
        SceneKind::Nexus => {
            let profile: NexusProfile = load_profile(profile)?;
            let mut scene = NexusScene::new(profile, cli.width, cli.height, 0.0, cli.seed)?;
            step(&mut scene, cli)
        }
        SceneKind::Grass => {
            let profile: GrassProfile = load_profile(profile)?;
            let mut scene = GrassScene::new(profile, cli.width, cli.height, cli.seed)?;
            step(&mut scene, cli)
        }
        SceneKind::Galaxy => {
            let profile: GalaxyProfile = load_profile(profile)?;
            let mut scene = GalaxyScene::new(profile, cli.width, cli.height, cli.seed)?;
            step(&mut scene, cli)
        }
    };

    if cli.heightmap.is_some() && cli.scene != SceneKind::Fall {
        log::warn!("--heightmap only applies to the fall scene");
    }
    Ok(summary)
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(summary) => {
            log::info!("  Frames: {}", summary.frames);
            log::info!("  Draw calls: {}", summary.draws);
            log::info!("  Uploaded: {} KB", summary.uploaded / 1024);
            for (kind, count) in &summary.by_kind {
                log::info!("    {kind}: {count}");
            }
            if let Some(delay) = summary.last_delay {
                log::info!("  Next frame in: {} ms", delay.as_millis());
            }
            log::info!("Done!");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
