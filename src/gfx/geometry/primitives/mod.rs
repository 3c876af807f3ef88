//! # Primitive Shape Generation
//!
//! Every generator computes its exact vertex and index counts up front,
//! allocates a [`Geometry`](super::Geometry) of that size and fills it
//! completely. Round shapes walk their angle in fixed steps, rotating a
//! running vertex by one precomputed step matrix, so positions carry the
//! accumulated floating-point drift of repeated rotation.
//!
//! Shapes are built around the +Z axis (or in the XY plane). Use
//! [`Geometry::oriented`](super::Geometry::oriented) with an
//! [`Axis`](super::Axis) to face them elsewhere.

mod arc;
mod axes;
mod box_shape;
mod circle;
mod cone;
mod cylinder;
mod grid;
mod plane;
mod sphere;

pub use arc::{arc, arc_band};
pub use axes::axes;
pub use box_shape::box_geometry;
pub use circle::{circle, ring};
pub use cone::cone;
pub use cylinder::cylinder;
pub use grid::{grid, GridPlane};
pub use plane::{plane, quad};
pub use sphere::{sphere, uv_sphere};

use cgmath::Matrix4;

use crate::math::transform;

/// Rotation about +Z by one of `segments` equal steps of `radians`.
fn step_rotation(radians: f64, segments: u32) -> Matrix4<f32> {
    assert!(segments > 0, "a round shape needs at least one segment");
    transform::rotation_z(radians / segments as f64)
}
