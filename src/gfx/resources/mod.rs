//! Device resource wrappers
//!
//! Each wrapper starts unallocated (`handle() == None`), creates its device
//! object on first bind or upload, and frees it on `delete`. Deleting twice is
//! a no-op. Every operation takes the [`Context`](crate::gfx::device::Context)
//! explicitly; nothing is cached in globals.

pub mod buffer;
pub mod framebuffer;
pub mod program;
pub mod renderbuffer;
pub mod shader;
pub mod texture;
pub mod uniform_buffer;
pub mod viewport;

pub use buffer::GlBuffer;
pub use framebuffer::Framebuffer;
pub use program::{Attribute, Program, Uniform};
pub use renderbuffer::Renderbuffer;
pub use shader::Shader;
pub use texture::Texture;
pub use uniform_buffer::UniformBlock;
pub use viewport::Viewport;
