use cgmath::Vector3;

use super::plane;
use crate::gfx::geometry::{Axis, Geometry, Primitive, VertexFormat};

/// Axis-aligned box centered at the origin, built from six subdivided planes.
///
/// Faces come in the order +X, -X, +Y, -Y, +Z, -Z and do not share vertices,
/// so each keeps its own flat normal and texture coordinates.
pub fn box_geometry(
    width: f32,
    height: f32,
    depth: f32,
    width_segments: u32,
    height_segments: u32,
    depth_segments: u32,
) -> Geometry {
    let (ws, hs, ds) = (
        width_segments as usize,
        height_segments as usize,
        depth_segments as usize,
    );
    let num_vertices = 2 * ((ws + 1) * (hs + 1) + (ws + 1) * (ds + 1) + (hs + 1) * (ds + 1));
    let num_indices = 12 * (ws * hs + ws * ds + hs * ds);
    let mut g = Geometry::new(Primitive::Triangles, VertexFormat::PNT, num_vertices, num_indices);

    let faces = [
        (Axis::PosX, depth, height, depth_segments, height_segments, Vector3::new(width / 2.0, 0.0, 0.0)),
        (Axis::NegX, depth, height, depth_segments, height_segments, Vector3::new(-width / 2.0, 0.0, 0.0)),
        (Axis::PosY, width, depth, width_segments, depth_segments, Vector3::new(0.0, height / 2.0, 0.0)),
        (Axis::NegY, width, depth, width_segments, depth_segments, Vector3::new(0.0, -height / 2.0, 0.0)),
        (Axis::PosZ, width, height, width_segments, height_segments, Vector3::new(0.0, 0.0, depth / 2.0)),
        (Axis::NegZ, width, height, width_segments, height_segments, Vector3::new(0.0, 0.0, -depth / 2.0)),
    ];
    for (axis, w, h, w_segs, h_segs, offset) in faces {
        let face = plane(w, h, w_segs, h_segs).oriented(axis);
        g.append_mapped(&face, |mut v| {
            v.position += offset;
            v
        });
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_unit_box_counts() {
        let b = box_geometry(2.0, 2.0, 2.0, 1, 1, 1);
        assert_eq!(b.num_vertices(), 24);
        assert_eq!(b.num_indices(), 36);
        assert_eq!(b.num_primitives(), 12);
    }

    #[test]
    fn test_subdivided_box_counts() {
        let b = box_geometry(1.0, 1.0, 1.0, 2, 3, 4);
        assert_eq!(b.num_vertices(), 2 * (3 * 4 + 3 * 5 + 4 * 5));
        assert_eq!(b.num_indices(), 12 * (6 + 8 + 12));
    }

    #[test]
    fn test_box_stays_inside_its_extent() {
        let b = box_geometry(2.0, 4.0, 6.0, 1, 2, 3);
        let bounds = b.bounds().expect("box has vertices");
        assert!((bounds.min - Vector3::new(-1.0, -2.0, -3.0)).magnitude() < 1e-5);
        assert!((bounds.max - Vector3::new(1.0, 2.0, 3.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_faces_point_outward() {
        let b = box_geometry(2.0, 2.0, 2.0, 1, 1, 1);
        for v in b.vertices() {
            // Every vertex sits on the face its normal names.
            assert!((v.position.dot(v.normal) - 1.0).abs() < 1e-5);
        }
    }
}
