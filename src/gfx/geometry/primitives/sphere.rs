use cgmath::InnerSpace;

use super::box_geometry;
use crate::gfx::geometry::{Geometry, Primitive, Vertex, VertexFormat};

/// Sphere made by pushing a subdivided cube out onto a sphere of `radius`.
///
/// Each cube face keeps its texture coordinates, so the sphere tiles a texture
/// six times.
pub fn sphere(radius: f32, segments: u32) -> Geometry {
    let cube = box_geometry(1.0, 1.0, 1.0, segments, segments, segments);
    let mut g = Geometry::new(
        Primitive::Triangles,
        VertexFormat::PNT,
        cube.num_vertices(),
        cube.num_indices(),
    );
    g.append_mapped(&cube, |mut v| {
        let direction = v.position.normalize();
        v.normal = direction;
        v.position = direction * radius;
        v
    });
    g
}

/// Latitude/longitude sphere with poles on the Z axis.
pub fn uv_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> Geometry {
    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);
    let mut g = Geometry::new(
        Primitive::Triangles,
        VertexFormat::PNT,
        ((lat_segs + 1) * (long_segs + 1)) as usize,
        (lat_segs * long_segs * 6) as usize,
    );

    for lat in 0..=lat_segs {
        let theta = lat as f32 * std::f32::consts::PI / lat_segs as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for long in 0..=long_segs {
            let phi = long as f32 * std::f32::consts::TAU / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let (x, y, z) = (sin_theta * cos_phi, sin_theta * sin_phi, cos_theta);
            g.put_vertex(
                &Vertex::new(x * radius, y * radius, z * radius)
                    .with_normal(x, y, z)
                    .with_tex_coords(
                        long as f32 / long_segs as f32,
                        1.0 - lat as f32 / lat_segs as f32,
                    ),
            );
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;
            g.put_indices(&[first, second, first + 1, second, second + 1, first + 1]);
        }
    }
    g
}
