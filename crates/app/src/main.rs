use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use soundwalk_core::{
    Category, ExperienceConfig, SoundMap, SoundwalkError, VolumeState, Walkthrough,
};
use tracing_subscriber::EnvFilter;

mod scripted;

use scripted::ScriptedSource;

fn main() -> soundwalk_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Walk { config, steps } => run_walk(config.as_deref(), steps),
        Commands::Probe { map, x, y } => run_probe(&map, x, y),
    }
}

/// Simulated stroll across the floor plan: registers one demo source per
/// configured track, walks the loading-to-synchronized transition, then
/// moves the pointer along the diagonal and reports the resulting gains.
fn run_walk(config: Option<&Path>, steps: u32) -> soundwalk_core::Result<()> {
    let config = match config {
        Some(path) => ExperienceConfig::load(path)?,
        None => ExperienceConfig::default(),
    };
    tracing::info!(
        map = %config.map_path,
        tracks = config.tracks.len(),
        "starting walkthrough demo"
    );

    let mut walk = Walkthrough::new();
    walk.bind_map(load_sound_map(Path::new(&config.map_path))?);
    walk.set_master_volume_percent(config.master_volume_percent)?;
    walk.set_category_volume(
        Category::Ambient,
        f32::from(config.ambient_volume_percent.min(100)) / 100.0,
    )?;

    let mut sources = Vec::new();
    for spec in &config.tracks {
        let source = Arc::new(Mutex::new(ScriptedSource::new(&spec.path, 120.0)));
        walk.add_source(spec.category, source.clone());
        sources.push(source);
    }

    // The first user gesture; sources are usually still buffering here.
    walk.start()?;

    // Sources finish buffering one by one, the way media elements announce
    // they can play through.
    for source in &sources {
        finish_loading(source)?;
        walk.source_loaded()?;
    }
    tracing::info!(loaded = walk.all_sounds_loaded(), "all demo sources ready");

    for step in 0..=steps {
        let t = step as f32 / steps.max(1) as f32;
        walk.pointer_moved(t, t)?;
        let color = walk.sampled_color();
        tracing::info!(
            step,
            x = t,
            y = t,
            r = color.r,
            g = color.g,
            b = color.b,
            club = walk.gain_for(Category::Club),
            street = walk.gain_for(Category::Street),
            home = walk.gain_for(Category::Home),
            ambient = walk.gain_for(Category::Ambient),
            "sampled"
        );
    }

    for source in &sources {
        let guard = source
            .lock()
            .map_err(|_| SoundwalkError::msg("demo source lock poisoned"))?;
        tracing::info!(
            source = guard.name(),
            position = guard.position_seconds(),
            volume = guard.volume(),
            "final source state"
        );
    }
    Ok(())
}

/// One-shot sample of the sound map at a normalized position.
fn run_probe(map: &Path, x: f32, y: f32) -> soundwalk_core::Result<()> {
    let map = load_sound_map(map)?;
    let color = map.sample(x, y);
    let volumes = VolumeState::default();

    tracing::info!(x, y, r = color.r, g = color.g, b = color.b, "sampled color");
    for category in Category::ALL {
        let gain = soundwalk_core::compute_gain(category, color, &volumes);
        tracing::info!(?category, gain, "mapped gain");
    }
    Ok(())
}

fn load_sound_map(path: &Path) -> soundwalk_core::Result<SoundMap> {
    if !path.exists() {
        tracing::error!(path = %path.display(), "sound map image does not exist");
        return Err(SoundwalkError::MissingResource("sound map image"));
    }

    let image = image::open(path)
        .map_err(|err| {
            SoundwalkError::msg(format!(
                "could not decode sound map {}: {err}",
                path.display()
            ))
        })?
        .to_rgba8();
    let (width, height) = image.dimensions();
    SoundMap::from_rgba8(width, height, image.into_raw())
}

fn finish_loading(source: &Arc<Mutex<ScriptedSource>>) -> soundwalk_core::Result<()> {
    let mut guard = source
        .lock()
        .map_err(|_| SoundwalkError::msg("demo source lock poisoned"))?;
    guard.finish_loading();
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive floor-plan audio walkthrough", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a pointer stroll across the configured experience.
    Walk {
        /// Optional JSON experience description; built-in defaults otherwise.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of pointer steps along the floor-plan diagonal.
        #[arg(short, long, default_value_t = 8)]
        steps: u32,
    },
    /// Sample the sound map once and print the mapped gains.
    Probe {
        /// Path to the sound-map image.
        map: PathBuf,
        /// Normalized horizontal position in [0, 1].
        x: f32,
        /// Normalized vertical position in [0, 1].
        y: f32,
    },
}
