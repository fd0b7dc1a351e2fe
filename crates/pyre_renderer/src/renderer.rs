//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded at [`MAX_DEPTH`] bounces
//! - A white-to-blue sky gradient for rays that escape
//! - Anti-aliasing via multi-sampling and gamma-2 correction
//! - Parallel rendering of horizontal bands on a rayon thread pool

use crate::band::{generate_bands, render_band};
use crate::{Camera, Color, HitRecord, Hittable, ImageBuffer, Ray, RenderError, RenderResult, Rgb};
use pyre_math::{unit_vector, Interval};
use rand::RngCore;
use rayon::prelude::*;
use std::time::Instant;

/// Maximum number of bounces before a path is treated as absorbed.
pub const MAX_DEPTH: u32 = 50;

/// Lower bound on hit distance, keeps bounced rays off their own surface.
pub const T_MIN: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Worker threads, one horizontal band each
    pub threads: usize,
    /// Base seed; every band derives its own stream from it
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            samples_per_pixel: 200,
            threads: 4,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Aspect ratio of the output image.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        let invalid = |msg: &str| -> RenderResult<()> {
            Err(RenderError::InvalidConfig(msg.to_string()))
        };

        if self.width == 0 || self.height == 0 {
            return invalid("image dimensions must be non-zero");
        }
        if self.samples_per_pixel == 0 {
            return invalid("samples per pixel must be non-zero");
        }
        if self.threads == 0 {
            return invalid("thread count must be non-zero");
        }
        Ok(())
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and multiplying in each material's
/// attenuation until the ray escapes to the sky, is absorbed, or runs
/// out of bounces.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut rec = HitRecord::default();

    if !world.hit(ray, Interval::new(T_MIN, f32::MAX), &mut rec) {
        return sky_color(ray);
    }

    // Scatter before checking depth so every hit consumes the same random draws
    match rec.material.scatter(ray, &rec, rng) {
        Some(result) if depth < MAX_DEPTH => {
            result.attenuation * ray_color(&result.scattered, world, depth + 1, rng)
        }
        _ => Color::ZERO,
    }
}

/// Sky gradient seen by rays that escape the scene.
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = unit_vector(ray.direction());
    let t = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - t) + blue * t
}

/// Convert an averaged linear color to 8-bit RGB.
///
/// Applies gamma 2 (square root) and truncates `255.99 * channel`.
/// Out-of-range values saturate and NaN maps to 0.
pub fn color_to_rgb(color: Color) -> Rgb {
    let r = (255.99 * color.x.sqrt()) as u8;
    let g = (255.99 * color.y.sqrt()) as u8;
    let b = (255.99 * color.z.sqrt()) as u8;
    [r, g, b]
}

/// Render a single pixel with multi-sampling.
///
/// `row` counts from the top of the image. Returns the averaged linear color.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    row: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // Image-plane v grows upward
    let j = config.height - 1 - row;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let u = (x as f32 + crate::gen_f32(rng)) / config.width as f32;
        let v = (j as f32 + crate::gen_f32(rng)) / config.height as f32;
        let ray = camera.get_ray(u, v, rng);
        pixel_color += ray_color(&ray, world, 0, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Render the entire scene to an image buffer.
///
/// The image is split into one horizontal band per worker thread. Bands
/// render in parallel on a dedicated rayon pool and are stitched together
/// top to bottom once every worker has finished.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    config.validate()?;

    let bands = generate_bands(config.width, config.height, config.threads);
    if bands.len() < config.threads {
        log::warn!(
            "Requested {} threads but image has only {} rows; using {} bands",
            config.threads,
            config.height,
            bands.len()
        );
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(bands.len())
        .thread_name(|i| format!("pyre-band-{i}"))
        .build()?;

    log::info!(
        "Rendering {}x{} @ {} spp on {} bands",
        config.width,
        config.height,
        config.samples_per_pixel,
        bands.len()
    );
    let start = Instant::now();

    // Results come back in band order regardless of completion order
    let results: Vec<_> = pool.install(|| {
        bands
            .par_iter()
            .map(|band| render_band(band, camera, world, config))
            .collect()
    });

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in results {
        image.write_rows(result.band.y, &result.pixels);
    }

    let elapsed = start.elapsed();
    let samples = config.width as f64 * config.height as f64 * config.samples_per_pixel as f64;
    log::info!(
        "Rendered in {:.2?} ({:.0} samples/s)",
        elapsed,
        samples / elapsed.as_secs_f64().max(f64::EPSILON)
    );

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraSettings, HittableList, Lambertian, Metal, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ground_and_metal() -> HittableList {
        let mut world = HittableList::new();
        world.add(Box::new(
            Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, Lambertian::new(Color::splat(0.5))).unwrap(),
        ));
        world.add(Box::new(
            Sphere::new(Vec3::new(0.0, 0.5, 0.0), 0.5, Metal::new(Color::new(0.8, 0.6, 0.2), 0.1)).unwrap(),
        ));
        world
    }

    fn camera_for(config: &RenderConfig) -> Camera {
        CameraSettings::new()
            .with_position(Vec3::new(0.0, 1.0, 4.0), Vec3::new(0.0, 0.5, 0.0), Vec3::Y)
            .with_lens(60.0, 0.0, 4.0)
            .with_aspect(config.aspect_ratio())
            .build()
            .unwrap()
    }

    fn small_config(samples_per_pixel: u32) -> RenderConfig {
        RenderConfig {
            width: 20,
            height: 10,
            samples_per_pixel,
            threads: 3,
            seed: 1234,
        }
    }

    #[test]
    fn test_sky_color_on_miss() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(0);

        for direction in [
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, 0.3, -2.0),
            Vec3::new(-0.2, -0.7, 0.1),
        ] {
            let ray = Ray::new(Vec3::ZERO, direction);
            let t = 0.5 * (unit_vector(direction).y + 1.0);
            let expected = Color::ONE.lerp(Color::new(0.5, 0.7, 1.0), t);
            let color = ray_color(&ray, &world, 0, &mut rng);
            assert!((color - expected).length() < 1e-6, "{color:?} != {expected:?}");
        }
    }

    #[test]
    fn test_sky_gradient_ends() {
        let up = sky_color(&Ray::new(Vec3::ZERO, Vec3::Y));
        let down = sky_color(&Ray::new(Vec3::ZERO, -Vec3::Y));

        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);
        assert!((down - Color::ONE).length() < 1e-6);
    }

    #[test]
    fn test_depth_limit_returns_black() {
        let world = ground_and_metal();
        let ray = Ray::new(Vec3::new(0.0, 1.0, 4.0), Vec3::new(0.0, -0.1, -1.0));
        let mut rng = StdRng::seed_from_u64(5);

        // Already at the limit: the hit is absorbed instead of bounced
        assert_eq!(ray_color(&ray, &world, MAX_DEPTH, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_ray_inside_mirror_ball_is_absorbed() {
        // From inside, every mirror reflection points back into the surface
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Vec3::ZERO, 10.0, Metal::new(Color::ONE, 0.0)).unwrap()));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.3, 0.2, 1.0));
        let mut rng = StdRng::seed_from_u64(8);

        assert_eq!(ray_color(&ray, &world, 0, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        // Gamma 2: 0.25 -> 0.5 -> 127
        assert_eq!(color_to_rgb(Color::splat(0.25)), [127, 127, 127]);
        assert_eq!(color_to_rgb(Color::new(f32::NAN, 4.0, 0.0)), [0, 255, 0]);
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let config = small_config(4);
        let camera = camera_for(&config);
        let world = ground_and_metal();
        let mut rng = StdRng::seed_from_u64(42);

        // Bottom-center pixel looks at the ground
        let color = render_pixel(&camera, &world, 10, 9, &config, &mut rng);
        assert!(color.length() > 0.0);
        assert!(color.max_element() <= 1.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(RenderConfig::default().validate().is_ok());

        for config in [
            RenderConfig { width: 0, ..small_config(1) },
            RenderConfig { height: 0, ..small_config(1) },
            RenderConfig { samples_per_pixel: 0, ..small_config(1) },
            RenderConfig { threads: 0, ..small_config(1) },
        ] {
            let camera = camera_for(&small_config(1));
            let result = render(&camera, &ground_and_metal(), &config);
            assert!(matches!(result, Err(RenderError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_render_is_deterministic_for_a_seed() {
        let config = RenderConfig {
            samples_per_pixel: 1,
            ..small_config(1)
        };
        let camera = camera_for(&config);
        let world = ground_and_metal();

        let first = render(&camera, &world, &config).unwrap();
        let second = render(&camera, &world, &config).unwrap();
        assert_eq!(first.pixels(), second.pixels());

        let reseeded = render(&camera, &world, &RenderConfig { seed: 99, ..config.clone() }).unwrap();
        assert_ne!(first.pixels(), reseeded.pixels());
    }

    #[test]
    fn test_more_samples_reduce_error() {
        let world = ground_and_metal();
        let base = RenderConfig {
            width: 8,
            height: 6,
            ..small_config(1)
        };
        let camera = camera_for(&base);

        // Compare linear colors against a high sample reference
        let average = |samples: u32, seed: u64| -> Vec<Color> {
            let config = RenderConfig {
                samples_per_pixel: samples,
                ..base.clone()
            };
            let mut rng = StdRng::seed_from_u64(seed);
            (0..config.height)
                .flat_map(|row| (0..config.width).map(move |x| (x, row)))
                .map(|(x, row)| render_pixel(&camera, &world, x, row, &config, &mut rng))
                .collect()
        };
        let mse = |a: &[Color], b: &[Color]| -> f32 {
            a.iter().zip(b).map(|(x, y)| (*x - *y).length_squared()).sum::<f32>() / a.len() as f32
        };

        let reference = average(512, 1);
        let coarse = mse(&average(1, 2), &reference);
        let medium = mse(&average(16, 3), &reference);
        let fine = mse(&average(128, 4), &reference);

        assert!(medium < coarse, "16 spp error {medium} >= 1 spp error {coarse}");
        assert!(fine < medium, "128 spp error {fine} >= 16 spp error {medium}");
    }

    #[test]
    fn test_end_to_end_ground_and_metal() {
        let config = RenderConfig {
            width: 20,
            height: 10,
            samples_per_pixel: 4,
            threads: 4,
            seed: 7,
        };
        let camera = camera_for(&config);
        let image = render(&camera, &ground_and_metal(), &config).unwrap();

        assert_eq!(image.width(), 20);
        assert_eq!(image.height(), 10);
        assert_eq!(image.pixels().len(), 200);

        // Distance of a row's average color from the gamma-encoded sky blue
        let sky_blue = color_to_rgb(Color::new(0.5, 0.7, 1.0));
        let row_distance = |row: u32| -> f32 {
            (0..image.width())
                .map(|x| {
                    let p = image.get(x, row);
                    (0..3)
                        .map(|c| (p[c] as f32 - sky_blue[c] as f32).powi(2))
                        .sum::<f32>()
                        .sqrt()
                })
                .sum::<f32>()
                / image.width() as f32
        };

        assert!(
            row_distance(0) < row_distance(image.height() - 1),
            "top row should be closer to the sky than the bottom row"
        );
    }
}
