use super::step_rotation;
use crate::gfx::geometry::{Geometry, Primitive, Vertex, VertexFormat};

/// Filled pie slice in the XY plane sweeping `radians` counter-clockwise from
/// +X: a triangle fan from the center over `segments + 1` rim vertices.
pub fn arc(radius: f32, radians: f64, segments: u32) -> Geometry {
    let m = step_rotation(radians, segments);
    let mut g = Geometry::new(Primitive::TriangleFan, VertexFormat::PN, segments as usize + 2, 0);
    g.put_vertex(&Vertex::new(0.0, 0.0, 0.0).with_normal(0.0, 0.0, 1.0));
    let mut v = Vertex::new(radius, 0.0, 0.0).with_normal(0.0, 0.0, 1.0);
    for _ in 0..=segments {
        g.put_vertex(&v);
        v.transform(&m);
    }
    g
}

/// Curved band between two radii, as a triangle strip.
pub fn arc_band(inner_radius: f32, outer_radius: f32, radians: f64, segments: u32) -> Geometry {
    let m = step_rotation(radians, segments);
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
