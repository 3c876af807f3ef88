use cgmath::{InnerSpace, Vector3};

use super::step_rotation;
use crate::gfx::geometry::{Geometry, Primitive, Vertex, VertexFormat};

/// Cylinder (or truncated cone) along Z, from `-length / 2` to `length / 2`.
///
/// `top_radius` applies at +Z and `bottom_radius` at -Z. With `fill_ends` the
/// result is an indexed triangle list with capped ends; without, it is an open
/// triangle strip around the side.
pub fn cylinder(top_radius: f32, bottom_radius: f32, length: f32, segments: u32, fill_ends: bool) -> Geometry {
    let m = step_rotation(std::f64::consts::TAU, segments);
    let side_normal = Vector3::new(length, 0.0, bottom_radius - top_radius).normalize();
    let mut top = Vertex::new(top_radius, 0.0, length / 2.0).with_normal_v(side_normal);
    let mut bottom = Vertex::new(bottom_radius, 0.0, -length / 2.0).with_normal_v(side_normal);
    let s = segments as usize;

    if !fill_ends {
        let mut g = Geometry::new(Primitive::TriangleStrip, VertexFormat::PN, 2 * s + 2, 0);
        for _ in 0..=s {
            g.put_vertex(&top);
            g.put_vertex(&bottom);
            top.transform(&m);
            bottom.transform(&m);
        }
        return g;
    }

    let mut g = Geometry::new(
        Primitive::Triangles,
        VertexFormat::PN,
        4 * s,
        6 * s + 2 * 3 * s.saturating_sub(2),
    );

    for i in 0..s {
        g.put_vertex(&top);
        g.put_vertex(&bottom);
        top.transform(&m);
        bottom.transform(&m);

        let cur = 2 * i as u32;
        let next = 2 * ((i + 1) % s) as u32;
        g.put_indices(&[cur, cur + 1, next + 1, cur, next + 1, next]);
    }

    let start = 2 * s as u32;
    let mut cap = Vertex::new(top_radius, 0.0, length / 2.0).with_normal(0.0, 0.0, 1.0);
    for i in 0..s {
        g.put_vertex(&cap);
        cap.transform(&m);
        if i + 2 < s {
            let i = i as u32;
            g.put_indices(&[start, start + i + 1, start + i + 2]);
        }
    }

    let start = 3 * s as u32;
    let mut cap = Vertex::new(bottom_radius, 0.0, -length / 2.0).with_normal(0.0, 0.0, -1.0);
    for i in 0..s {
        g.put_vertex(&cap);
        cap.transform(&m);
        if i + 2 < s {
            let i = i as u32;
            g.put_indices(&[start, start + i + 2, start + i + 1]);
        }
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_counts() {
        let c = cylinder(1.0, 1.0, 2.0, 16, true);
        assert_eq!(c.primitive(), Primitive::Triangles);
        assert_eq!(c.num_vertices(), 64);
        assert_eq!(c.num_indices(), 12 * 16 - 12);
    }

    #[test]
    fn test_filled_with_too_few_segments_for_caps() {
        let one = cylinder(1.0, 1.0, 2.0, 1, true);
        assert_eq!((one.num_vertices(), one.num_indices()), (4, 6));
        let two = cylinder(1.0, 1.0, 2.0, 2, true);
        assert_eq!((two.num_vertices(), two.num_indices()), (8, 12));
        assert_eq!(cylinder(1.0, 1.0, 2.0, 3, true).num_indices(), 18 + 6);
    }

    #[test]
    fn test_open_strip_closes_the_loop() {
        let c = cylinder(1.0, 1.0, 2.0, 8, false);
        assert_eq!(c.primitive(), Primitive::TriangleStrip);
        assert_eq!(c.num_vertices(), 18);
        assert!(!c.is_indexed());
        let first = c.vertex(0).position;
        let last = c.vertex(16).position;
        assert!((first - last).magnitude() < 1e-5);
    }

    #[test]
    fn test_caps_face_out() {
        let c = cylinder(1.0, 1.0, 2.0, 6, true);
        assert_eq!(c.vertex(12).normal, Vector3::unit_z());
        assert_eq!(c.vertex(18).normal, -Vector3::unit_z());
        assert_eq!(c.vertex(12).position.z, 1.0);
        assert_eq!(c.vertex(18).position.z, -1.0);
    }

    #[test]
    fn test_tapered_side_normal_tilts_toward_narrow_end() {
        let c = cylinder(0.5, 1.0, 2.0, 4, false);
        let n = c.vertex(0).normal;
        assert!(n.z > 0.0);
        assert!((n.magnitude() - 1.0).abs() < 1e-5);
    }
}
