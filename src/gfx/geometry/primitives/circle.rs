use super::step_rotation;
use crate::gfx::geometry::{Geometry, Primitive, Vertex, VertexFormat};

/// Filled disc in the XY plane as a triangle fan over its rim.
pub fn circle(radius: f32, segments: u32) -> Geometry {
    let m = step_rotation(std::f64::consts::TAU, segments);
    let mut g = Geometry::new(Primitive::TriangleFan, VertexFormat::PN, segments as usize, 0);
    let mut v = Vertex::new(radius, 0.0, 0.0).with_normal(0.0, 0.0, 1.0);
    for _ in 0..segments {
        g.put_vertex(&v);
        v.transform(&m);
    }
    g
}

/// Flat ring in the XY plane as a closed triangle strip, inner then outer
/// vertex at each step.
pub fn ring(inner_radius: f32, outer_radius: f32, segments: u32) -> Geometry {
    let m = step_rotation(std::f64::consts::TAU, segments);
    let mut g = Geometry::new(
        Primitive::TriangleStrip,
        VertexFormat::PN,
        2 * segments as usize + 2,
        0,
    );
    let mut inner = Vertex::new(inner_radius, 0.0, 0.0).with_normal(0.0, 0.0, 1.0);
    let mut outer = Vertex::new(outer_radius, 0.0, 0.0).with_normal(0.0, 0.0, 1.0);
    for _ in 0..=segments {
        g.put_vertex(&inner);
        g.put_vertex(&outer);
        inner.transform(&m);
        outer.transform(&m);
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_disc() {
        let c = circle(2.0, 12);
        assert_eq!(c.primitive(), Primitive::TriangleFan);
        assert_eq!(c.num_vertices(), 12);
        assert_eq!(c.num_primitives(), 10);
        for v in c.vertices() {
            assert!((v.position.magnitude() - 2.0).abs() < 1e-4);
            assert_eq!(v.position.z, 0.0);
        }
    }

    #[test]
    fn test_ring_alternates_radii() {
        let r = ring(1.0, 3.0, 6);
        assert_eq!(r.num_vertices(), 14);
        for (i, v) in r.vertices().enumerate() {
            let expected = if i % 2 == 0 { 1.0 } else { 3.0 };
            assert!((v.position.magnitude() - expected).abs() < 1e-4);
        }
    }
}
