//! Camera for ray generation.

use crate::{gen_f32, Ray, SceneError, SceneResult};
use pyre_math::{unit_vector, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// Placement and lens parameters a [`Camera`] is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    // Camera positioning
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,

    // Lens settings
    pub vfov: f32,       // Vertical field of view in degrees
    pub aspect: f32,     // Image width / height
    pub aperture: f32,   // Lens diameter, 0 for a pinhole
    pub focus_dist: f32, // Distance from camera to plane of perfect focus
}

impl CameraSettings {
    /// Create camera settings with default values.
    pub fn new() -> Self {
        Self {
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            aspect: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the aspect ratio (width / height).
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Validate the settings and derive the camera basis and viewport.
    pub fn build(&self) -> SceneResult<Camera> {
        self.validate()?;

        let theta = self.vfov * PI / 180.0;
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect * half_height;

        let origin = self.look_from;
        let w = unit_vector(self.look_from - self.look_at);
        let u = unit_vector(self.vup.cross(w));
        let v = w.cross(u);

        let focus_dist = self.focus_dist;
        let lower_left_corner = origin
            - u * (half_width * focus_dist)
            - v * (half_height * focus_dist)
            - w * focus_dist;

        Ok(Camera {
            origin,
            lower_left_corner,
            horizontal: u * (2.0 * half_width * focus_dist),
            vertical: v * (2.0 * half_height * focus_dist),
            u,
            v,
            w,
            lens_radius: self.aperture / 2.0,
        })
    }

    fn validate(&self) -> SceneResult<()> {
        let invalid = |msg: &str| -> SceneResult<()> {
            Err(SceneError::InvalidCamera(msg.to_string()))
        };

        if !(self.look_from.is_finite() && self.look_at.is_finite() && self.vup.is_finite()) {
            return invalid("position vectors must be finite");
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return invalid("vertical field of view must be between 0 and 180 degrees");
        }
        if !(self.aspect.is_finite() && self.aspect > 0.0) {
            return invalid("aspect ratio must be positive");
        }
        if !(self.aperture.is_finite() && self.aperture >= 0.0) {
            return invalid("aperture must be zero or positive");
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return invalid("focus distance must be positive");
        }

        let view = self.look_from - self.look_at;
        if view.length_squared() == 0.0 {
            return invalid("look_from and look_at must differ");
        }
        if self.vup.cross(view).length_squared() == 0.0 {
            return invalid("up vector must not be parallel to the view direction");
        }
        Ok(())
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Thin-lens camera. Immutable once built.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Generate a ray through normalized image coordinates (s, t).
    ///
    /// (0, 0) is the lower-left corner of the viewport and (1, 1) the
    /// upper-right. The origin is jittered across the lens so that only the
    /// focus plane is sharp.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;

        let target = self.lower_left_corner + self.horizontal * s + self.vertical * t;
        Ray::new(self.origin + offset, target - self.origin - offset)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }

    /// Camera basis (right, up, backward).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}

/// Sample a point in the unit disk.
fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = 2.0 * Vec3::new(gen_f32(rng), gen_f32(rng), 0.0) - Vec3::new(1.0, 1.0, 0.0);
        if p.dot(p) < 1.0 {
            return p;
        }
    }
}
