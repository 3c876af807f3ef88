// src/lib.rs
//! jgl
//!
//! A convenience layer over OpenGL: device resource wrappers with explicit
//! lifetimes, `cgmath`-based transforms, procedural geometry, cameras with a
//! first-person controller, Phong shading helpers and Wavefront OBJ/MTL
//! loading.
//!
//! Rendering goes through a [`Context`](gfx::device::Context) wrapping any
//! [`GraphicsDevice`](gfx::device::GraphicsDevice): the `glow` backend for a
//! real GL context, or the headless device for tests and tooling.

pub mod error;
pub mod gfx;
pub mod loaders;
pub mod math;
pub mod prelude;

// Re-export main types for convenience
pub use error::{Error, Result};
