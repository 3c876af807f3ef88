//! # Vector and Matrix Math
//!
//! Vectors and matrices are the `cgmath` value types. A shared borrow
//! (`&Vector3<f32>`) is the read-only view; only an owned or `&mut` value is
//! ever modified, so an arithmetic expression like `a + b` can never alias or
//! change its inputs. In-place forms (`a += b`, `v = v.normalize()`) are the
//! mutating counterparts.
//!
//! `normalize` divides by the length without checking for zero; a zero-length
//! vector produces NaN components, which callers must tolerate.
//!
//! Matrices are column-major, matching the OpenGL convention, and the builders
//! in [`transform`] reproduce the classic fixed-function utility formulas.

pub mod bounds;
pub mod matrix;
pub mod swizzle;
pub mod transform;

use cgmath::{Vector2, Vector3, Vector4};

pub use bounds::{Aabb, ConvexPolygon, Edge, Line, Plane, Ray, Sphere, Triangle};
pub use matrix::{column3, inverse, transform_direction, transform_point};
pub use swizzle::Swizzle;

pub type Vec2 = Vector2<f32>;
pub type Vec3 = Vector3<f32>;
pub type Vec4 = Vector4<f32>;
pub type Vec2d = Vector2<f64>;
pub type Vec3d = Vector3<f64>;
pub type Vec4d = Vector4<f64>;
pub type Mat4 = cgmath::Matrix4<f32>;

pub const PI: f32 = std::f32::consts::PI;

/// Clamps `value` into `[min, max]`. NaN passes through unchanged.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Converts spherical coordinates to Cartesian.
///
/// `altitude` is the elevation above the horizontal plane and `azimuth` the
/// rotation around the up axis. With `y_up` the up axis is +Y and azimuth 0
/// points along +Z; otherwise the up axis is +Z and azimuth 0 points along -Y.
pub fn spherical_to_cartesian(radius: f32, altitude: f32, azimuth: f32, y_up: bool) -> Vec3 {
    let (radius, altitude, azimuth) = (radius as f64, altitude as f64, azimuth as f64);
    if y_up {
        Vec3::new(
            (radius * altitude.cos() * azimuth.sin()) as f32,
            (radius * altitude.sin()) as f32,
            (radius * azimuth.cos() * altitude.cos()) as f32,
        )
    } else {
        Vec3::new(
            (radius * altitude.cos() * azimuth.sin()) as f32,
            -(radius * azimuth.cos() * altitude.cos()) as f32,
            (radius * altitude.sin()) as f32,
        )
    }
}

/// Inverse of [`spherical_to_cartesian`]: returns `(radius, altitude, azimuth)`
/// with azimuth in `[0, 2π)`.
pub fn cartesian_to_spherical(x: f32, y: f32, z: f32, y_up: bool) -> Vec3 {
    let radius = (x * x + y * y + z * z).sqrt();
    let (altitude, mut azimuth) = if y_up {
        ((y / radius).asin(), x.atan2(z))
    } else {
        ((z / radius).asin(), x.atan2(-y))
    };
    if azimuth < 0.0 {
        azimuth += PI * 2.0;
    }
    Vec3::new(radius, altitude, azimuth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Zero};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_negation_sums_to_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let v = Vec3::new(
                rng.random_range(-100.0..100.0),
                rng.random_range(-100.0..100.0),
                rng.random_range(-100.0..100.0),
            );
            let sum = v + (-v);
            assert!(sum.magnitude() < 1e-6);

            let w = Vec4d::new(
                rng.random_range(-1e3..1e3),
                rng.random_range(-1e3..1e3),
                rng.random_range(-1e3..1e3),
                rng.random_range(-1e3..1e3),
            );
            assert_eq!(w + (-w), Vec4d::zero());
        }
    }

    #[test]
    fn test_arithmetic_leaves_inputs_untouched() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        let c = a + b;
        assert_eq!(a, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(c, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.cross(b), Vec3::new(-3.0, 6.0, -3.0));
    }

    #[test]
    fn test_normalizing_zero_vector_is_unchecked() {
        let n = Vec3::zero().normalize();
        assert!(n.x.is_nan());
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn test_spherical_round_trip() {
        for &y_up in &[true, false] {
            let p = spherical_to_cartesian(2.0, 0.3, 1.1, y_up);
            assert!((p.magnitude() - 2.0).abs() < 1e-5);
            let s = cartesian_to_spherical(p.x, p.y, p.z, y_up);
            assert!((s.x - 2.0).abs() < 1e-5);
            assert!((s.y - 0.3).abs() < 1e-5);
            assert!((s.z - 1.1).abs() < 1e-5);
        }
    }

    #[test]
    fn test_spherical_forward_conventions() {
        let y_up = spherical_to_cartesian(1.0, 0.0, 0.0, true);
        assert!((y_up - Vec3::unit_z()).magnitude() < 1e-6);
        let z_up = spherical_to_cartesian(1.0, 0.0, 0.0, false);
        assert!((z_up + Vec3::unit_y()).magnitude() < 1e-6);
    }
}
