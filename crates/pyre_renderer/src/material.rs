//! Material trait for surface scattering.

use crate::{gen_f32, hittable::HitRecord, Ray, SceneError, SceneResult};
use pyre_math::{unit_vector, Vec3};
use rand::RngCore;

/// Color type alias (linear RGB values, typically 0-1)
pub type Color = Vec3;

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Color multiplier applied to light arriving along `scattered`
    pub attenuation: Color,
    /// The outgoing ray, starting at the hit point
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns Some(ScatterResult) if the ray scatters,
    /// or None if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;

    /// Check the construction parameters.
    fn validate(&self) -> SceneResult<()> {
        Ok(())
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        // Aim at a random point in the unit sphere resting on the surface
        let target = rec.p + rec.normal + random_in_unit_sphere(rng);

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, target - rec.p),
        })
    }

    fn validate(&self) -> SceneResult<()> {
        validate_albedo(self.albedo)
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, capped at 1.0
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: if fuzz < 1.0 { fuzz } else { 1.0 },
        }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(unit_vector(ray_in.direction()), rec.normal);
        let scattered = Ray::new(rec.p, reflected + self.fuzz * random_in_unit_sphere(rng));

        // Rays bent back into the surface are absorbed
        if scattered.direction().dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered,
            })
        } else {
            None
        }
    }

    fn validate(&self) -> SceneResult<()> {
        validate_albedo(self.albedo)?;
        if self.fuzz.is_nan() || self.fuzz < 0.0 {
            return Err(SceneError::InvalidFuzz(self.fuzz));
        }
        Ok(())
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ref_idx: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ref_idx`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ref_idx: f32) -> Self {
        Self { ref_idx }
    }

    pub fn ref_idx(&self) -> f32 {
        self.ref_idx
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let direction = ray_in.direction();
        let reflected = reflect(direction, rec.normal);
        let d_dot_n = direction.dot(rec.normal);

        let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
            // Leaving the medium
            (-rec.normal, self.ref_idx, self.ref_idx * d_dot_n / direction.length())
        } else {
            (rec.normal, 1.0 / self.ref_idx, -d_dot_n / direction.length())
        };

        // Total internal reflection leaves no refracted ray and forces a reflection
        let refracted = refract(direction, outward_normal, ni_over_nt);
        let reflect_prob = match refracted {
            Some(_) => schlick(cosine, self.ref_idx),
            None => 1.0,
        };

        // One draw per scatter, even when the choice is forced
        let xi = gen_f32(rng);
        let out = match refracted {
            Some(refracted) if xi >= reflect_prob => refracted,
            _ => reflected,
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, out),
        })
    }

    fn validate(&self) -> SceneResult<()> {
        if !(self.ref_idx.is_finite() && self.ref_idx > 0.0) {
            return Err(SceneError::InvalidRefractiveIndex(self.ref_idx));
        }
        Ok(())
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface with Snell's law.
///
/// Returns None when the discriminant is not positive (total internal reflection).
#[inline]
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = unit_vector(v);
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for reflectance
#[inline]
pub fn schlick(cosine: f32, ref_idx: f32) -> f32 {
    let r0 = (1.0 - ref_idx) / (1.0 + ref_idx);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

fn validate_albedo(albedo: Color) -> SceneResult<()> {
    if albedo.is_finite() && albedo.min_element() >= 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidAlbedo)
    }
}

/// Generate a random point inside the unit sphere by rejection sampling.
pub(crate) fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = 2.0 * Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng)) - Vec3::ONE;
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
