//! Band-based parallel rendering.
//!
//! Divides the image into horizontal row bands, one per worker. Each band
//! is rendered independently with its own random stream into its own pixel
//! segment, so workers never share mutable state.

use crate::renderer::{color_to_rgb, render_pixel};
use crate::{Camera, Hittable, RenderConfig, Rgb};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A contiguous range of image rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First row of the band, counted from the top
    pub y: u32,
    /// Number of rows in the band
    pub height: u32,
    /// Width of the image in pixels
    pub width: u32,
    /// Position of this band from the top of the image
    pub index: usize,
}

impl Band {
    /// Create a new band.
    pub fn new(y: u32, height: u32, width: u32, index: usize) -> Self {
        Self { y, height, width, index }
    }

    /// Get the total number of pixels in this band.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Split an image into `count` bands of near-equal height.
///
/// Rows that do not divide evenly go one each to the first bands. Never
/// produces more bands than rows, so no band is empty.
pub fn generate_bands(width: u32, height: u32, count: usize) -> Vec<Band> {
    let count = (count as u32).min(height).max(1);
    let base = height / count;
    let remainder = height % count;

    let mut bands = Vec::with_capacity(count as usize);
    let mut y = 0;
    for index in 0..count {
        let rows = base + u32::from(index < remainder);
        bands.push(Band::new(y, rows, width, index as usize));
        y += rows;
    }

    bands
}

/// Seed for a band's random stream.
///
/// Mixes the band index into the base seed so that neighbouring bands and
/// neighbouring base seeds land on unrelated streams.
pub fn band_seed(seed: u64, index: usize) -> u64 {
    // SplitMix64 finalizer
    let mut z = seed.wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Result of rendering a band.
#[derive(Debug, Clone)]
pub struct BandResult {
    /// The band that was rendered
    pub band: Band,
    /// Pixel colors in row-major order
    pub pixels: Vec<Rgb>,
}

impl BandResult {
    /// Create a new band result.
    pub fn new(band: Band, pixels: Vec<Rgb>) -> Self {
        Self { band, pixels }
    }
}

/// Render a single band to 8-bit pixels.
///
/// Returns pixels in row-major order, top row first.
pub fn render_band(band: &Band, camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> BandResult {
    let mut rng = StdRng::seed_from_u64(band_seed(config.seed, band.index));
    let mut pixels = Vec::with_capacity(band.pixel_count() as usize);

    for row in band.y..band.y + band.height {
        for x in 0..band.width {
            let color = render_pixel(camera, world, x, row, config, &mut rng);
            pixels.push(color_to_rgb(color));
        }
    }

    log::debug!(
        "Band {} finished: rows {}..{}",
        band.index,
        band.y,
        band.y + band.height
    );

    BandResult::new(*band, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraSettings, HittableList};

    #[test]
    fn test_generate_bands_exact_fit() {
        let bands = generate_bands(800, 600, 4);
        assert_eq!(bands.len(), 4);
        assert!(bands.iter().all(|b| b.height == 150));

        // Total pixels should equal image size
        let total_pixels: u32 = bands.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 800 * 600);
    }

    #[test]
    fn test_generate_bands_remainder() {
        let bands = generate_bands(10, 10, 4);
        let heights: Vec<u32> = bands.iter().map(|b| b.height).collect();
        assert_eq!(heights, vec![3, 3, 2, 2]);

        // Contiguous, in order, covering every row
        let mut next = 0;
        for (i, band) in bands.iter().enumerate() {
            assert_eq!(band.index, i);
            assert_eq!(band.y, next);
            next += band.height;
        }
        assert_eq!(next, 10);
    }

    #[test]
    fn test_more_threads_than_rows() {
        let bands = generate_bands(5, 3, 8);
        assert_eq!(bands.len(), 3);
        assert!(bands.iter().all(|b| b.height == 1));
    }

    #[test]
    fn test_band_seeds_are_distinct() {
        let seeds: Vec<u64> = (0..64).map(|i| band_seed(0, i)).collect();
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_ne!(band_seed(0, 1), band_seed(1, 0));
        assert_eq!(band_seed(42, 3), band_seed(42, 3));
    }

    #[test]
    fn test_render_band_pixel_count() {
        let config = RenderConfig {
            width: 6,
            height: 4,
            samples_per_pixel: 2,
            threads: 2,
            seed: 0,
        };
        let camera = CameraSettings::new()
            .with_aspect(config.aspect_ratio())
            .build()
            .unwrap();
        let world = HittableList::new();

        let band = generate_bands(config.width, config.height, config.threads)[1];
        let result = render_band(&band, &camera, &world, &config);

        assert_eq!(result.band, band);
        assert_eq!(result.pixels.len(), 12);

        // Empty world: every pixel is sky, bluer toward the top of the band
        let top = result.pixels[0];
        let bottom = result.pixels[11];
        assert!(top[0] <= bottom[0]);
        assert_eq!(top[2], 255);
    }
}
