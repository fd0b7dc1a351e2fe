//! Ready-made scenes.

use crate::{gen_f32, Color, Dielectric, HittableList, Lambertian, Metal, SceneResult, Sphere, Vec3};
use rand::RngCore;

/// The ground plus three large feature spheres: glass, diffuse and mirror.
pub fn showcase_scene() -> SceneResult<HittableList> {
    let mut world = HittableList::new();
    add_ground(&mut world)?;
    add_feature_spheres(&mut world)?;
    Ok(world)
}

/// A field of small random spheres around three large feature spheres.
///
/// Small spheres sit on a jittered 22x22 grid; roughly 80% are diffuse,
/// 15% metal and 5% glass. Cells too close to the metal feature sphere are
/// left empty.
pub fn random_scene(rng: &mut dyn RngCore) -> SceneResult<HittableList> {
    let mut world = HittableList::new();
    add_ground(&mut world)?;

    let clearance = Vec3::new(4.0, 0.2, 0.0);
    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - clearance).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse
                let albedo = Color::new(
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                );
                world.add(Box::new(Sphere::new(center, 0.2, Lambertian::new(albedo))?));
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = Color::new(
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                );
                let fuzz = 0.5 * gen_f32(rng);
                world.add(Box::new(Sphere::new(center, 0.2, Metal::new(albedo, fuzz))?));
            } else {
                // Glass
                world.add(Box::new(Sphere::new(center, 0.2, Dielectric::new(1.5))?));
            }
        }
    }

    add_feature_spheres(&mut world)?;
    log::debug!("Random scene built with {} spheres", world.len());
    Ok(world)
}

fn add_ground(world: &mut HittableList) -> SceneResult<()> {
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(Color::new(0.5, 0.5, 0.5)),
    )?));
    Ok(())
}

fn add_feature_spheres(world: &mut HittableList) -> SceneResult<()> {
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Dielectric::new(1.5))?));
    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::new(Color::new(0.4, 0.2, 0.1)),
    )?));
    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    )?));
    Ok(())
}
