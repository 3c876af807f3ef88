//! # jgl Prelude
//!
//! Commonly used types and traits in one import:
//!
//! ```rust
//! use jgl::prelude::*;
//!
//! let mut ctx = Context::new(HeadlessDevice::new());
//! let mut mesh = Mesh::new(sphere(1.0, 4));
//! mesh.upload(&mut ctx).unwrap();
//! ```

// Errors
pub use crate::error::{Error, Result};

// Device and resources
pub use crate::gfx::device::{
    BufferTarget, BufferUsage, Context, GraphicsDevice, HeadlessDevice, PixelFormat, ShaderKind,
    TextureTarget, UniformValue,
};
pub use crate::gfx::resources::{Framebuffer, GlBuffer, Program, Shader, Texture, Viewport};

// Geometry and meshes
pub use crate::gfx::geometry::{
    arc, axes, box_geometry, circle, cone, cylinder, grid, plane, sphere, uv_sphere, Axis,
    Geometry, IndexWidth, Primitive, Semantic, Vertex, VertexFormat,
};
pub use crate::gfx::mesh::{Mesh, MeshPart};

// Cameras and shading
pub use crate::gfx::camera::{Camera, CameraRig, FirstPersonController, MotionParameter};
pub use crate::gfx::shading::{Light, LightModel, PhongMaterial};

// Loaders
pub use crate::loaders::{load_obj, load_shader, load_texture, ObjLoadOptions, ObjModel};

// Math
pub use crate::math::{transform, Aabb, Swizzle, Vec2, Vec3, Vec4};
pub use cgmath::{InnerSpace, Matrix, Matrix4, SquareMatrix, Vector2, Vector3, Vector4, Zero};
