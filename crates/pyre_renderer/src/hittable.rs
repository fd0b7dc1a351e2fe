//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Material, Ray, ScatterResult};
use pyre_math::{Interval, Vec3};
use rand::RngCore;

/// A dummy material used for HitRecord::default().
/// Always absorbs light (returns None from scatter).
struct DummyMaterial;

impl Material for DummyMaterial {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        None
    }
}

/// Static dummy material instance for Default impl.
static DUMMY_MATERIAL: DummyMaterial = DummyMaterial;

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Outward unit surface normal. Not flipped toward the ray: materials
    /// compare it with the ray direction to tell entering from exiting.
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            t: 0.0,
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &DUMMY_MATERIAL,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object strictly inside the given interval.
    ///
    /// Returns true if hit, and fills in the hit record. The record is left
    /// untouched on a miss.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;
}

/// The scene: an ordered list of hittable objects.
///
/// The list is the single owner of every object and, through them, of every
/// material. Everything is released together when the list is dropped.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> &[Box<dyn Hittable>] {
        &self.objects
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        // Linear scan; each object only has to beat the best hit so far.
        // Equal t never replaces an earlier hit because the bound is exclusive.
        for object in &self.objects {
            if object.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Metal, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere_at(z: f32, radius: f32) -> Box<dyn Hittable> {
        Box::new(Sphere::new(Vec3::new(0.0, 0.0, z), radius, Lambertian::new(Vec3::splat(0.5))).unwrap())
    }

    #[test]
    fn test_empty_list_misses() {
        let world = HittableList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(world.is_empty());
        assert!(!world.hit(&ray, Interval::new(0.001, f32::MAX), &mut rec));
    }

    #[test]
    fn test_closest_hit_wins_regardless_of_order() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let interval = Interval::new(0.001, f32::MAX);

        // Far sphere inserted first, near sphere second
        let mut world = HittableList::new();
        world.add(sphere_at(-10.0, 1.0));
        world.add(sphere_at(-4.0, 1.0));
        world.add(sphere_at(-7.0, 2.0));

        // Minimum over every object's individual test
        let expected = world
            .objects()
            .iter()
            .filter_map(|object| {
                let mut rec = HitRecord::default();
                object.hit(&ray, interval, &mut rec).then_some(rec.t)
            })
            .fold(f32::INFINITY, f32::min);

        let mut rec = HitRecord::default();
        assert!(world.hit(&ray, interval, &mut rec));
        assert_eq!(rec.t, expected);
        assert!((rec.t - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_interval_limits_hits() {
        let mut world = HittableList::new();
        world.add(sphere_at(-4.0, 1.0));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        // Both roots (3 and 5) lie beyond the upper bound
        assert!(!world.hit(&ray, Interval::new(0.001, 2.5), &mut rec));
        // Near root excluded, far root accepted
        assert!(world.hit(&ray, Interval::new(3.5, 10.0), &mut rec));
        assert!((rec.t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_hit_record_carries_material() {
        let mut world = HittableList::new();
        world.add(Box::new(
            Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, Metal::new(Vec3::new(0.9, 0.1, 0.1), 0.0)).unwrap(),
        ));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(world.hit(&ray, Interval::new(0.001, f32::MAX), &mut rec));

        // Mirror at normal incidence bounces straight back
        let mut rng = StdRng::seed_from_u64(7);
        let result = rec.material.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(result.attenuation, Vec3::new(0.9, 0.1, 0.1));
        assert!(result.scattered.direction().z > 0.0);
    }

    #[test]
    fn test_clear() {
        let mut world = HittableList::default();
        world.add(sphere_at(-4.0, 1.0));
        assert_eq!(world.len(), 1);
        world.clear();
        assert!(world.is_empty());
    }
}
