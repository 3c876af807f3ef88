//! Builders for the standard 4x4 transforms.
//!
//! All matrices are column-major; `Matrix4::new` takes its arguments column by
//! column. Angles are radians except for [`perspective`], whose vertical field
//! of view is in degrees as with `gluPerspective`.

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3};

pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

pub fn translation_v(v: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(v)
}

pub fn scale(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_nonuniform_scale(x, y, z)
}

pub fn uniform_scale(s: f32) -> Matrix4<f32> {
    Matrix4::from_scale(s)
}

pub fn rotation_x(radians: f64) -> Matrix4<f32> {
    let c = radians.cos() as f32;
    let s = radians.sin() as f32;
    #[rustfmt::skip]
    let m = Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0,   c,   s, 0.0,
        0.0,  -s,   c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    m
}

pub fn rotation_y(radians: f64) -> Matrix4<f32> {
    let c = radians.cos() as f32;
    let s = radians.sin() as f32;
    #[rustfmt::skip]
    let m = Matrix4::new(
          c, 0.0,  -s, 0.0,
        0.0, 1.0, 0.0, 0.0,
          s, 0.0,   c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    m
}

pub fn rotation_z(radians: f64) -> Matrix4<f32> {
    let c = radians.cos() as f32;
    let s = radians.sin() as f32;
    #[rustfmt::skip]
    let m = Matrix4::new(
          c,   s, 0.0, 0.0,
         -s,   c, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    m
}

/// Rotation of `radians` about an arbitrary axis. The axis is normalized first.
pub fn rotation(axis: Vector3<f32>, radians: f64) -> Matrix4<f32> {
    let u = axis.normalize();
    let c = radians.cos() as f32;
    let s = radians.sin() as f32;
    let ic = 1.0 - c;
    let (x, y, z) = (u.x, u.y, u.z);

    #[rustfmt::skip]
    let m = Matrix4::new(
        c + x * x * ic,     y * x * ic + z * s, z * x * ic - y * s, 0.0,
        x * y * ic - z * s, c + y * y * ic,     z * y * ic + x * s, 0.0,
        x * z * ic + y * s, y * z * ic - x * s, c + z * z * ic,     0.0,
        0.0,                0.0,                0.0,                1.0,
    );
    m
}

/// Combined rotation from yaw (about Y), pitch (about X) and roll (about Z).
pub fn yaw_pitch_roll(yaw: f64, pitch: f64, roll: f64) -> Matrix4<f32> {
    let a = yaw.cos() as f32;
    let b = yaw.sin() as f32;
    let c = pitch.cos() as f32;
    let d = pitch.sin() as f32;
    let f = roll.cos() as f32;
    let g = roll.sin() as f32;

    #[rustfmt::skip]
    let m = Matrix4::new(
        f * a + d * g * b,  c * g, d * g * a - f * b, 0.0,
        -g * a + d * f * b, c * f, d * f * a + g * b, 0.0,
        c * b,              -d,    c * a,             0.0,
        0.0,                0.0,   0.0,               1.0,
    );
    m
}

/// Perspective projection for an off-axis frustum, as `glFrustum`.
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4<f32> {
    let a = (right + left) / (right - left);
    let b = (top + bottom) / (top - bottom);
    let c = -(far + near) / (far - near);
    let d = -(2.0 * far * near) / (far - near);

    #[rustfmt::skip]
    let m = Matrix4::new(
        2.0 * near / (right - left), 0.0,                         0.0, 0.0,
        0.0,                         2.0 * near / (top - bottom), 0.0, 0.0,
        a,                           b,                           c,  -1.0,
        0.0,                         0.0,                         d,   0.0,
    );
    m
}

/// Symmetric perspective projection, as `gluPerspective`. `fov_y` is in degrees.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    let f = 1.0 / ((fov_y as f64).to_radians() / 2.0).tan() as f32;

    #[rustfmt::skip]
    let m = Matrix4::new(
        f / aspect, 0.0, 0.0,                                0.0,
        0.0,        f,   0.0,                                0.0,
        0.0,        0.0, (far + near) / (near - far),       -1.0,
        0.0,        0.0, 2.0 * far * near / (near - far),    0.0,
    );
    m
}

/// Orthographic projection, as `glOrtho`.
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4<f32> {
    let tx = -(right + left) / (right - left);
    let ty = -(top + bottom) / (top - bottom);
    let tz = -(far + near) / (far - near);

    #[rustfmt::skip]
    let m = Matrix4::new(
        2.0 / (right - left), 0.0,                  0.0,                0.0,
        0.0,                  2.0 / (top - bottom), 0.0,                0.0,
        0.0,                  0.0,                  -2.0 / (far - near), 0.0,
        tx,                   ty,                   tz,                 1.0,
    );
    m
}

/// Orthographic projection with near -1 and far 1, as `gluOrtho2D`.
pub fn orthographic_2d(left: f32, right: f32, bottom: f32, top: f32) -> Matrix4<f32> {
    orthographic(left, right, bottom, top, -1.0, 1.0)
}

/// Viewing transform, as `gluLookAt`.
///
/// The forward direction is `center - eye`; the side vector is `forward × up`
/// and the corrected up is `side × forward`. The result maps `eye` to the
/// origin looking down -Z.
pub fn look_at(eye: Vector3<f32>, center: Vector3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    let f = (center - eye).normalize();
    let s = f.cross(up.normalize()).normalize();
    let u = s.cross(f).normalize();

    #[rustfmt::skip]
    let m = Matrix4::new(
        s.x, u.x, -f.x, 0.0,
        s.y, u.y, -f.y, 0.0,
        s.z, u.z, -f.z, 0.0,
        0.0, 0.0,  0.0, 1.0,
    );
    m * translation_v(-eye)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{transform_direction, transform_point};

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_axis_rotations_follow_right_hand_rule() {
        let half = std::f64::consts::FRAC_PI_2;
        assert_close(transform_direction(&rotation_x(half), Vector3::unit_y()), Vector3::unit_z());
        assert_close(transform_direction(&rotation_y(half), Vector3::unit_z()), Vector3::unit_x());
        assert_close(transform_direction(&rotation_z(half), Vector3::unit_x()), Vector3::unit_y());
    }

    #[test]
    fn test_axis_angle_matches_axis_rotations() {
        let angle = 0.7;
        let pairs = [
            (rotation(Vector3::unit_x(), angle), rotation_x(angle)),
            (rotation(Vector3::unit_y(), angle), rotation_y(angle)),
            (rotation(Vector3::unit_z() * 3.0, angle), rotation_z(angle)),
        ];
        for (a, b) in pairs.iter() {
            let pa: &[f32; 16] = a.as_ref();
            let pb: &[f32; 16] = b.as_ref();
            for i in 0..16 {
                assert!((pa[i] - pb[i]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let eye = Vector3::new(3.0, 4.0, 5.0);
        let view = look_at(eye, Vector3::new(0.0, 0.0, 0.0), Vector3::unit_y());
        assert_close(transform_point(&view, eye), Vector3::new(0.0, 0.0, 0.0));

        let target = transform_point(&view, Vector3::new(0.0, 0.0, 0.0));
        assert!(target.x.abs() < 1e-5 && target.y.abs() < 1e-5);
        assert!(target.z < 0.0);
    }

    #[test]
    fn test_perspective_matches_frustum() {
        let near = 0.1;
        let far = 100.0;
        let aspect = 1.5;
        let top = near * (30.0f32.to_radians()).tan();
        let p = perspective(60.0, aspect, near, far);
        let f = frustum(-top * aspect, top * aspect, -top, top, near, far);
        let pa: &[f32; 16] = p.as_ref();
        let pb: &[f32; 16] = f.as_ref();
        for i in 0..16 {
            assert!((pa[i] - pb[i]).abs() < 1e-4, "element {}", i);
        }
    }

    #[test]
    fn test_orthographic_2d_maps_corners() {
        let m = orthographic_2d(0.0, 800.0, 0.0, 600.0);
        assert_close(transform_point(&m, Vector3::new(0.0, 0.0, 0.0)), Vector3::new(-1.0, -1.0, 0.0));
        assert_close(transform_point(&m, Vector3::new(800.0, 600.0, 0.0)), Vector3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_yaw_pitch_roll_identity() {
        let m = yaw_pitch_roll(0.0, 0.0, 0.0);
        assert_eq!(m, identity());
    }
}
