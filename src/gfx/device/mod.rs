//! # Graphics Device Boundary
//!
//! Every resource wrapper in [`crate::gfx::resources`] talks to the GPU through
//! the [`GraphicsDevice`] trait. Two implementations exist:
//!
//! - [`GlowDevice`]: OpenGL through `glow` (native targets only)
//! - [`HeadlessDevice`]: a software stand-in that records state, used by tests
//!
//! Handles are non-zero integers. A handle that has not been allocated yet,
//! or has been deleted, is represented by `None` in the wrappers.
//!
//! A [`Context`] owns the device together with the binding cache that lets
//! programs and textures skip redundant rebinds. All device work happens on
//! the thread that owns the context.

pub mod headless;

#[cfg(not(target_arch = "wasm32"))]
pub mod glow_device;

use std::cell::Cell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::num::NonZeroU32;

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

use crate::error::Result;
use crate::gfx::geometry::{IndexWidth, Primitive};

pub use headless::HeadlessDevice;

#[cfg(not(target_arch = "wasm32"))]
pub use glow_device::GlowDevice;

/// Opaque device object identifier.
pub type Handle = NonZeroU32;

/// Location of a uniform within a linked program.
pub type UniformLocation = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderKind {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderKind::Vertex => glow::VERTEX_SHADER,
            ShaderKind::Fragment => glow::FRAGMENT_SHADER,
            ShaderKind::Geometry => glow::GEOMETRY_SHADER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
    Uniform,
}

impl BufferTarget {
    pub fn gl_enum(self) -> u32 {
        match self {
            BufferTarget::Array => glow::ARRAY_BUFFER,
            BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
            BufferTarget::Uniform => glow::UNIFORM_BUFFER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    #[default]
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

impl BufferUsage {
    pub fn gl_enum(self) -> u32 {
        match self {
            BufferUsage::StaticDraw => glow::STATIC_DRAW,
            BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
            BufferUsage::StreamDraw => glow::STREAM_DRAW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureTarget {
    #[default]
    Texture2D,
    Texture3D,
    CubeMap,
    Texture2DMultisample,
}

impl TextureTarget {
    pub fn gl_enum(self) -> u32 {
        match self {
            TextureTarget::Texture2D => glow::TEXTURE_2D,
            TextureTarget::Texture3D => glow::TEXTURE_3D,
            TextureTarget::CubeMap => glow::TEXTURE_CUBE_MAP,
            TextureTarget::Texture2DMultisample => glow::TEXTURE_2D_MULTISAMPLE,
        }
    }
}

/// Pixel layout of texture data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgb,
    Rgba,
    Depth,
}

impl PixelFormat {
    pub fn gl_enum(self) -> u32 {
        match self {
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
            PixelFormat::Depth => glow::DEPTH_COMPONENT,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
            PixelFormat::Depth => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FramebufferTarget {
    #[default]
    Framebuffer,
    Draw,
    Read,
}

impl FramebufferTarget {
    pub fn gl_enum(self) -> u32 {
        match self {
            FramebufferTarget::Framebuffer => glow::FRAMEBUFFER,
            FramebufferTarget::Draw => glow::DRAW_FRAMEBUFFER,
            FramebufferTarget::Read => glow::READ_FRAMEBUFFER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    Color(u32),
    Depth,
    Stencil,
    DepthStencil,
}

impl Attachment {
    pub fn gl_enum(self) -> u32 {
        match self {
            Attachment::Color(i) => glow::COLOR_ATTACHMENT0 + i,
            Attachment::Depth => glow::DEPTH_ATTACHMENT,
            Attachment::Stencil => glow::STENCIL_ATTACHMENT,
            Attachment::DepthStencil => glow::DEPTH_STENCIL_ATTACHMENT,
        }
    }
}

/// A value that can be written to a uniform location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Int(v as i32)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vector2<f32>> for UniformValue {
    fn from(v: Vector2<f32>) -> Self {
        UniformValue::Vec2(v.into())
    }
}

impl From<Vector3<f32>> for UniformValue {
    fn from(v: Vector3<f32>) -> Self {
        UniformValue::Vec3(v.into())
    }
}

impl From<Vector4<f32>> for UniformValue {
    fn from(v: Vector4<f32>) -> Self {
        UniformValue::Vec4(v.into())
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Matrix4<f32>> for UniformValue {
    fn from(m: Matrix4<f32>) -> Self {
        let flat: &[f32; 16] = m.as_ref();
        UniformValue::Mat4(*flat)
    }
}

/// An attribute or uniform reported by a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVariable {
    pub name: String,
    /// Array length, 1 for non-arrays.
    pub size: i32,
    /// GL type enum (`FLOAT_VEC3`, `SAMPLER_2D`, ...).
    pub gl_type: u32,
}

/// The operations the resource wrappers need from a graphics API.
///
/// Methods mirror the OpenGL entry points they stand for. Creation calls are
/// fallible; everything else reports errors through status queries, as GL
/// does.
pub trait GraphicsDevice {
    // Buffers
    fn create_buffer(&mut self) -> Result<Handle>;
    fn delete_buffer(&mut self, buffer: Handle);
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<Handle>);
    fn bind_buffer_base(&mut self, target: BufferTarget, index: u32, buffer: Option<Handle>);
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]);

    // Vertex arrays and attributes
    fn create_vertex_array(&mut self) -> Result<Handle>;
    fn delete_vertex_array(&mut self, vertex_array: Handle);
    fn bind_vertex_array(&mut self, vertex_array: Option<Handle>);
    fn enable_vertex_attrib_array(&mut self, location: u32);
    fn disable_vertex_attrib_array(&mut self, location: u32);
    fn vertex_attrib_pointer_f32(&mut self, location: u32, size: i32, normalized: bool, stride: i32, offset: i32);
    /// Sets the constant value used when the attribute array is disabled.
    fn vertex_attrib_f32(&mut self, location: u32, values: &[f32]);

    // Textures
    fn create_texture(&mut self) -> Result<Handle>;
    fn delete_texture(&mut self, texture: Handle);
    fn active_texture(&mut self, unit: u32);
    fn bind_texture(&mut self, target: TextureTarget, texture: Option<Handle>);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &mut self,
        target: TextureTarget,
        level: i32,
        internal_format: PixelFormat,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Option<&[u8]>,
    );
    fn tex_parameter_i32(&mut self, target: TextureTarget, parameter: u32, value: i32);
    fn pixel_store_i32(&mut self, parameter: u32, value: i32);
    fn generate_mipmap(&mut self, target: TextureTarget);

    // Renderbuffers
    fn create_renderbuffer(&mut self) -> Result<Handle>;
    fn delete_renderbuffer(&mut self, renderbuffer: Handle);
    fn bind_renderbuffer(&mut self, renderbuffer: Option<Handle>);
    /// `samples == 0` allocates single-sampled storage.
    fn renderbuffer_storage(&mut self, internal_format: u32, width: u32, height: u32, samples: u32);

    // Framebuffers
    fn create_framebuffer(&mut self) -> Result<Handle>;
    fn delete_framebuffer(&mut self, framebuffer: Handle);
    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<Handle>);
    fn framebuffer_texture_2d(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        texture_target: TextureTarget,
        texture: Option<Handle>,
        level: i32,
    );
    fn framebuffer_renderbuffer(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        renderbuffer: Option<Handle>,
    );
    fn check_framebuffer_status(&mut self, target: FramebufferTarget) -> u32;

    // Shaders
    fn create_shader(&mut self, kind: ShaderKind) -> Result<Handle>;
    fn shader_source(&mut self, shader: Handle, source: &str);
    fn compile_shader(&mut self, shader: Handle);
    fn shader_compile_status(&self, shader: Handle) -> bool;
    fn shader_info_log(&self, shader: Handle) -> String;
    fn delete_shader(&mut self, shader: Handle);

    // Programs
    fn create_program(&mut self) -> Result<Handle>;
    fn attach_shader(&mut self, program: Handle, shader: Handle);
    fn detach_shader(&mut self, program: Handle, shader: Handle);
    fn link_program(&mut self, program: Handle);
    fn program_link_status(&self, program: Handle) -> bool;
    fn validate_program(&mut self, program: Handle);
    fn program_validate_status(&self, program: Handle) -> bool;
    fn program_info_log(&self, program: Handle) -> String;
    fn use_program(&mut self, program: Option<Handle>);
    fn delete_program(&mut self, program: Handle);
    fn active_attributes(&self, program: Handle) -> Vec<ActiveVariable>;
    fn active_uniforms(&self, program: Handle) -> Vec<ActiveVariable>;
    fn attrib_location(&self, program: Handle, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: Handle, name: &str) -> Option<UniformLocation>;
    fn uniform_block_index(&self, program: Handle, name: &str) -> Option<u32>;
    fn uniform_block_binding(&mut self, program: Handle, block_index: u32, binding: u32);
    /// Writes a uniform of the program currently in use.
    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue);

    // Fixed state and drawing
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&mut self, mask: u32);
    fn draw_arrays(&mut self, mode: Primitive, first: i32, count: i32);
    fn draw_elements(&mut self, mode: Primitive, count: i32, index_width: IndexWidth, offset: i32);
}

/// Tracks what is currently bound so redundant rebinds can be skipped.
#[derive(Debug, Default)]
pub struct BindingCache {
    program: Option<Handle>,
    active_unit: u32,
    textures: HashMap<(u32, TextureTarget), Handle>,
}

impl BindingCache {
    pub fn program(&self) -> Option<Handle> {
        self.program
    }

    pub fn active_unit(&self) -> u32 {
        self.active_unit
    }

    pub fn texture(&self, unit: u32, target: TextureTarget) -> Option<Handle> {
        self.textures.get(&(unit, target)).copied()
    }

    /// Forgets every binding, e.g. after foreign code has touched the device.
    pub fn reset(&mut self) {
        self.program = None;
        self.active_unit = 0;
        self.textures.clear();
    }
}

/// A device plus the per-context binding cache.
///
/// Not `Sync`: a GL context belongs to one thread.
pub struct Context<D: GraphicsDevice> {
    device: D,
    bindings: BindingCache,
    _single_thread: PhantomData<Cell<()>>,
}

impl<D: GraphicsDevice> Context<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            bindings: BindingCache::default(),
            _single_thread: PhantomData,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn bindings(&self) -> &BindingCache {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut BindingCache {
        &mut self.bindings
    }

    pub fn into_device(self) -> D {
        self.device
    }

    /// Makes `program` current unless it already is.
    pub fn use_program(&mut self, program: Option<Handle>) {
        if self.bindings.program == program {
            return;
        }
        self.device.use_program(program);
        self.bindings.program = program;
    }

    pub fn active_texture(&mut self, unit: u32) {
        if self.bindings.active_unit == unit {
            return;
        }
        self.device.active_texture(unit);
        self.bindings.active_unit = unit;
    }

    /// Binds `texture` on the active unit unless it is already bound there.
    pub fn bind_texture(&mut self, target: TextureTarget, texture: Option<Handle>) {
        let key = (self.bindings.active_unit, target);
        if self.bindings.textures.get(&key).copied() == texture {
            return;
        }
        self.device.bind_texture(target, texture);
        match texture {
            Some(handle) => self.bindings.textures.insert(key, handle),
            None => self.bindings.textures.remove(&key),
        };
    }

    /// Drops cached bindings that refer to a deleted program.
    pub(crate) fn forget_program(&mut self, program: Handle) {
        if self.bindings.program == Some(program) {
            self.bindings.program = None;
        }
    }

    /// Drops cached bindings that refer to a deleted texture.
    pub(crate) fn forget_texture(&mut self, texture: Handle) {
        self.bindings.textures.retain(|_, bound| *bound != texture);
    }
}
