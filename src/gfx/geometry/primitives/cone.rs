use cgmath::{InnerSpace, Vector3};

use super::step_rotation;
use crate::gfx::geometry::{Geometry, Primitive, Vertex, VertexFormat};

/// Cone along Z with its apex at `length / 2` and base at `-length / 2`.
///
/// With `fill_base` the result is an indexed triangle list including the base
/// disc; without, an open triangle fan around the apex.
pub fn cone(base_radius: f32, length: f32, segments: u32, fill_base: bool) -> Geometry {
    let m = step_rotation(std::f64::consts::TAU, segments);
    let apex = Vertex::new(0.0, 0.0, length / 2.0).with_normal(0.0, 0.0, 1.0);
    let mut rim = Vertex::new(base_radius, 0.0, -length / 2.0)
        .with_normal_v(Vector3::new(length, 0.0, base_radius).normalize());
    let s = segments as usize;

    if !fill_base {
        let mut g = Geometry::new(Primitive::TriangleFan, VertexFormat::PN, s + 2, 0);
        g.put_vertex(&apex);
        for _ in 0..=s {
            g.put_vertex(&rim);
            rim.transform(&m);
        }
        return g;
    }

    let mut g = Geometry::new(
        Primitive::Triangles,
        VertexFormat::PN,
        2 * s + 1,
        3 * s + 3 * s.saturating_sub(2),
    );

    g.put_vertex(&apex);
    for i in 0..s as u32 {
        g.put_vertex(&rim);
        g.put_indices(&[0, i + 1, (i + 1) % segments + 1]);
        rim.transform(&m);
    }

    let base_start = segments + 1;
    let mut base = Vertex::new(base_radius, 0.0, -length / 2.0).with_normal(0.0, 0.0, -1.0);
    for i in 0..s as u32 {
        g.put_vertex(&base);
        base.transform(&m);
        if i + 2 < segments {
            g.put_indices(&[base_start, base_start + i + 1, base_start + i + 2]);
        }
    }
    g
}
