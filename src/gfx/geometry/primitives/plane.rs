use crate::gfx::geometry::{Geometry, Primitive, Vertex, VertexFormat};

/// Subdivided rectangle in the XY plane, centered at the origin and facing +Z.
///
/// Texture coordinates run from (0, 0) at the lower left to (1, 1) at the
/// upper right.
///
/// # Panics
///
/// Panics if either segment count is zero.
pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Geometry {
    assert!(
        width_segments > 0 && height_segments > 0,
        "a plane needs at least one segment in each direction"
    );
    let ws = width_segments as usize;
    let hs = height_segments as usize;
    let mut g = Geometry::new(
        Primitive::Triangles,
        VertexFormat::PNT,
        (ws + 1) * (hs + 1),
        ws * hs * 6,
    );

    for iy in 0..=hs {
        let ny = iy as f32 / hs as f32;
        for ix in 0..=ws {
            let nx = ix as f32 / ws as f32;
            let v = Vertex::new((nx - 0.5) * width, (ny - 0.5) * height, 0.0)
                .with_normal(0.0, 0.0, 1.0)
                .with_tex_coords(nx, ny);
            g.put_vertex(&v);

            if ix < ws && iy < hs {
                let i = (iy * (ws + 1) + ix) as u32;
                let row = ws as u32;
                g.put_indices(&[i, i + 1, i + 2 + row, i, i + 2 + row, i + 1 + row]);
            }
        }
    }
    g
}

/// Single quad: four corners and two triangles.
pub fn quad(width: f32, height: f32) -> Geometry {
    let (w, h) = (width / 2.0, height / 2.0);
    let mut g = Geometry::new(Primitive::Triangles, VertexFormat::PNT, 4, 6);
    for (x, y, u, v) in [(-w, -h, 0.0, 0.0), (w, -h, 1.0, 0.0), (w, h, 1.0, 1.0), (-w, h, 0.0, 1.0)] {
        g.put_vertex(&Vertex::new(x, y, 0.0).with_normal(0.0, 0.0, 1.0).with_tex_coords(u, v));
    }
    g.put_indices(&[0, 1, 2, 0, 2, 3]);
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector2, Vector3};

    #[test]
    fn test_plane_counts() {
        let p = plane(2.0, 2.0, 2, 2);
        assert_eq!(p.num_vertices(), 9);
        assert_eq!(p.num_indices(), 24);
        assert_eq!(p.num_primitives(), 8);
    }

    #[test]
    fn test_plane_corners_and_uvs() {
        let p = plane(4.0, 2.0, 2, 1);
        let first = p.vertex(0);
        let last = p.vertex(p.num_vertices() - 1);
        assert_eq!(first.position, Vector3::new(-2.0, -1.0, 0.0));
        assert_eq!(first.tex_coords, Vector2::new(0.0, 0.0));
        assert_eq!(last.position, Vector3::new(2.0, 1.0, 0.0));
        assert_eq!(last.tex_coords, Vector2::new(1.0, 1.0));
        assert!(p.vertices().all(|v| v.normal == Vector3::unit_z()));
    }

    #[test]
    fn test_plane_cell_indices() {
        let p = plane(1.0, 1.0, 1, 1);
        assert_eq!(p.indices().collect::<Vec<_>>(), vec![0, 1, 3, 0, 3, 2]);
    }

    #[test]
    fn test_quad() {
        let q = quad(2.0, 4.0);
        assert_eq!(q.num_vertices(), 4);
        assert_eq!(q.vertex(2).position, Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(q.indices().collect::<Vec<_>>(), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "at least one segment")]
    fn test_zero_segments_rejected() {
        plane(1.0, 1.0, 0, 1);
    }
}
