//! Pyre - CPU Path Tracing
//!
//! A Monte Carlo path tracer for scenes built from spheres with diffuse,
//! metal and glass surfaces. The image is split into horizontal bands that
//! are traced in parallel, each with its own random stream.

mod band;
mod camera;
mod error;
mod frame;
mod hittable;
mod material;
mod renderer;
mod scene;
mod sphere;

pub use band::{band_seed, generate_bands, render_band, Band, BandResult};
pub use camera::{Camera, CameraSettings};
pub use error::{RenderError, RenderResult, SceneError, SceneResult};
pub use frame::{ImageBuffer, Rgb};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{reflect, refract, schlick, Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    color_to_rgb, ray_color, render, render_pixel, sky_color, RenderConfig, MAX_DEPTH, T_MIN,
};
pub use scene::{random_scene, showcase_scene};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from pyre_math
pub use pyre_math::{unit_vector, Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Draw a uniform `f32` in `[0, 1)` from any random source.
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
