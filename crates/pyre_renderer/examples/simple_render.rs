//! Simple path tracer example.
//!
//! Renders the showcase scene at a low sample count and saves to PPM format.

use pyre_renderer::{render, showcase_scene, CameraSettings, RenderConfig, Vec3};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Pyre Path Tracer - Simple Example");
    println!("=================================");

    // Build the scene
    let start = std::time::Instant::now();
    let world = showcase_scene()?;
    println!("Scene built in {:?} ({} objects)", start.elapsed(), world.len());

    // Render configuration
    let config = RenderConfig {
        width: 400,
        height: 225,
        samples_per_pixel: 32,
        threads: 8,
        seed: 1,
    };

    // Set up camera
    let look_from = Vec3::new(13.0, 2.0, 3.0);
    let look_at = Vec3::new(0.0, 0.0, 0.0);
    let camera = CameraSettings::new()
        .with_position(look_from, look_at, Vec3::new(0.0, 1.0, 0.0))
        .with_lens(20.0, 0.1, 10.0)
        .with_aspect(config.aspect_ratio())
        .build()?;

    println!(
        "Rendering {}x{} @ {} spp...",
        config.width, config.height, config.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let image = render(&camera, &world, &config)?;
    println!("Rendered in {:?}", start.elapsed());

    // Save as PPM
    let filename = "output.ppm";
    image.save(filename)?;
    println!("Saved to {}", filename);

    Ok(())
}
