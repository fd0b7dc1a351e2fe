// Re-export glam for convenience
pub use glam::*;

// Pyre math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// Scale a vector to unit length by dividing through its length.
///
/// A zero vector yields NaN components; callers must not pass one.
#[inline]
pub fn unit_vector(v: Vec3) -> Vec3 {
    v / v.length()
}
