use crate::gfx::geometry::{Geometry, Primitive, Vertex, VertexFormat};
use crate::math::transform;

/// Plane a [`grid`] is laid out in. `width` runs along the first named axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPlane {
    XY,
    YZ,
    XZ,
}

/// Line grid centered at the origin with `width_segments + 1` lines across and
/// `height_segments + 1` lines up.
pub fn grid(width: f32, height: f32, width_segments: u32, height_segments: u32, plane: GridPlane) -> Geometry {
    assert!(
        width_segments > 0 && height_segments > 0,
        "a grid needs at least one segment in each direction"
    );
    let vertices = 2 * (width_segments + height_segments + 2) as usize;
    let mut g = Geometry::new(Primitive::Lines, VertexFormat::P, vertices, 0);
    let (hw, hh) = (width / 2.0, height / 2.0);

    for i in 0..=width_segments {
        let x = width * (i as f32 / width_segments as f32 - 0.5);
        g.put_vertex(&Vertex::new(x, -hh, 0.0));
        g.put_vertex(&Vertex::new(x, hh, 0.0));
    }
    for i in 0..=height_segments {
        let y = height * (i as f32 / height_segments as f32 - 0.5);
        g.put_vertex(&Vertex::new(-hw, y, 0.0));
        g.put_vertex(&Vertex::new(hw, y, 0.0));
    }

    match plane {
        GridPlane::XY => g,
        GridPlane::YZ => g.transformed(&transform::rotation_y(std::f64::consts::FRAC_PI_2)),
        GridPlane::XZ => g.transformed(&transform::rotation_x(-std::f64::consts::FRAC_PI_2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        let g = grid(4.0, 2.0, 4, 2, GridPlane::XY);
        assert_eq!(g.num_vertices(), 16);
        assert_eq!(g.num_primitives(), 8);
    }

    #[test]
    fn test_rows_use_height_spacing() {
        let g = grid(10.0, 2.0, 5, 2, GridPlane::XY);
        let rows: Vec<f32> = (12..g.num_vertices()).step_by(2).map(|i| g.vertex(i).position.y).collect();
        assert_eq!(rows, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_xz_grid_is_flat_in_y() {
        let g = grid(2.0, 2.0, 2, 2, GridPlane::XZ);
        assert!(g.vertices().all(|v| v.position.y.abs() < 1e-5));
    }
}
