//! # Graphics Module
//!
//! Everything that touches the graphics device or feeds it data.
//!
//! ## Architecture Overview
//!
//! - **Device** ([`device`]) - the [`GraphicsDevice`](device::GraphicsDevice)
//!   seam, a `glow` backend, a headless recorder and the binding cache
//! - **Resources** ([`resources`]) - buffers, textures, framebuffers, shaders
//!   and programs with explicit lifetimes
//! - **Geometry** ([`geometry`]) - packed vertex/index buffers and procedural
//!   shapes
//! - **Mesh** ([`mesh`]) - geometry split into material parts, uploaded and
//!   drawn through a program
//! - **Camera** ([`camera`]) - view/projection state and a first-person
//!   controller with smoothed motion
//! - **Shading** ([`shading`]) - Phong lights and materials
//!
//! ## Usage
//!
//! ```
//! use jgl::gfx::{device::{Context, HeadlessDevice}, geometry::box_geometry, Mesh};
//!
//! let mut ctx = Context::new(HeadlessDevice::new());
//! let mut mesh = Mesh::new(box_geometry(1.0, 1.0, 1.0, 1, 1, 1));
//! mesh.upload(&mut ctx).unwrap();
//! assert!(mesh.is_uploaded());
//! mesh.delete(&mut ctx);
//! ```

pub mod camera;
pub mod device;
pub mod geometry;
pub mod mesh;
pub mod resources;
pub mod shading;

// Re-export commonly used types
pub use camera::{Camera, FirstPersonController, MotionParameter};
pub use device::{Context, GraphicsDevice, HeadlessDevice};
pub use geometry::{Geometry, Primitive, Vertex, VertexFormat};
pub use mesh::{Mesh, MeshPart};
