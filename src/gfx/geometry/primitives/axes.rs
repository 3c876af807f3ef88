use cgmath::Vector3;

use super::{cone, cylinder};
use crate::gfx::geometry::{Axis, Geometry, Primitive, VertexFormat};
use crate::math::transform;

const SEGMENTS: u32 = 8;
const SHAFT_RADIUS: f32 = 0.05;
const HEAD_RADIUS: f32 = 0.15;
const HEAD_LENGTH: f32 = 0.3;

/// Three arrows from the origin along +X, +Y and +Z coloured red, green and
/// blue. Each shaft is `length` long with a cone head past its end.
pub fn axes(length: f32) -> Geometry {
    let shaft = cylinder(SHAFT_RADIUS, SHAFT_RADIUS, length, SEGMENTS, true)
        .transformed(&transform::translation(0.0, 0.0, length / 2.0));
    let head = cone(HEAD_RADIUS, HEAD_LENGTH, SEGMENTS, true)
        .transformed(&transform::translation(0.0, 0.0, length + HEAD_LENGTH / 2.0));

    let arrows = [
        (Axis::PosX, Vector3::new(1.0, 0.0, 0.0)),
        (Axis::PosY, Vector3::new(0.0, 1.0, 0.0)),
        (Axis::PosZ, Vector3::new(0.0, 0.0, 1.0)),
    ];
    let mut g = Geometry::new(
        Primitive::Triangles,
        VertexFormat::PNC,
        arrows.len() * (shaft.num_vertices() + head.num_vertices()),
        arrows.len() * (shaft.num_indices() + head.num_indices()),
    );
    for (axis, color) in arrows {
        let rotation = axis.rotation();
        for part in [&shaft, &head] {
            g.append_mapped(part, |v| {
                let mut v = v.transformed(&rotation);
                v.color = color;
                v
            });
        }
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_counts() {
        let a = axes(1.0);
        let per_axis_vertices = (2 * 8 + 1) + 4 * 8;
        let per_axis_indices = (6 * 8 - 6) + (12 * 8 - 12);
        assert_eq!(a.num_vertices(), 3 * per_axis_vertices);
        assert_eq!(a.num_indices(), 3 * per_axis_indices);
        assert_eq!(a.format(), &VertexFormat::PNC);
    }

    #[test]
    fn test_arrow_colours_follow_axes() {
        let a = axes(2.0);
        for v in a.vertices() {
            let c = v.color;
            if c.x == 1.0 {
                assert!(v.position.x > -1e-4);
            } else if c.y == 1.0 {
                assert!(v.position.y > -1e-4);
            } else {
                assert_eq!(c, Vector3::new(0.0, 0.0, 1.0));
                assert!(v.position.z > -1e-4);
            }
        }
    }
}
