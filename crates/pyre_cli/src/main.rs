use anyhow::{Context, Result};
use clap::Parser;
use pyre_renderer::{random_scene, render, showcase_scene, HittableList};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Instant;

mod config;

use config::{parse_vec3, SceneKind, Settings};

/// Offline Monte Carlo path tracer for sphere scenes.
#[derive(Parser, Debug)]
#[command(name = "pyre", version)]
pub struct Args {
    /// JSON settings file; flags given here override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    samples: Option<u32>,

    /// Worker threads (one horizontal band each)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Seed for scene generation and sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Built-in scene to render
    #[arg(long, value_enum)]
    scene: Option<SceneKind>,

    /// Camera position as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    look_from: Option<[f32; 3]>,

    /// Point the camera looks at, as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    look_at: Option<[f32; 3]>,

    /// Camera up vector as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    vup: Option<[f32; 3]>,

    /// Vertical field of view in degrees
    #[arg(long)]
    vfov: Option<f32>,

    /// Lens aperture (0 for a pinhole camera)
    #[arg(long)]
    aperture: Option<f32>,

    /// Distance to the plane of perfect focus
    #[arg(long)]
    focus_dist: Option<f32>,

    /// Output image path (.ppm or .png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the resolved settings as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn build_scene(settings: &Settings) -> Result<HittableList> {
    let world = match settings.scene {
        SceneKind::Random => {
            let mut rng = StdRng::seed_from_u64(settings.seed);
            random_scene(&mut rng)?
        }
        SceneKind::Showcase => showcase_scene()?,
    };
    Ok(world)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let settings = Settings::resolve(&args)?;

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    log::info!("Starting Pyre");

    let start = Instant::now();
    let world = build_scene(&settings).context("Failed to build scene")?;
    log::info!("Scene built with {} objects in {:?}", world.len(), start.elapsed());

    let camera = settings
        .camera_settings()
        .build()
        .context("Failed to set up camera")?;

    let image = render(&camera, &world, &settings.render_config())?;

    image
        .save(&settings.output)
        .with_context(|| format!("Failed to save image to {}", settings.output.display()))?;

    Ok(())
}
