//! Phong lighting: materials, lights and the light model
//!
//! Values reach shaders either as plain uniforms (`apply`) or as tightly
//! packed [`bytemuck::Pod`] blocks (`uniform`) suitable for a
//! [`UniformBlock`](crate::gfx::resources::UniformBlock).

pub mod light;
pub mod material;

pub use light::{Light, LightKind, LightModel, LightModelUniform, LightUniform, MAX_LIGHTS};
pub use material::{MaterialUniform, PhongMaterial};
