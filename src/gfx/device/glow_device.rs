//! OpenGL backend on top of `glow`.
//!
//! The caller creates the GL context (with winit + glutin, SDL, ...) and hands
//! the loaded `glow::Context` over. Every method is a direct pass-through; the
//! unsafe blocks rely on the context being current on the calling thread.

use glow::HasContext;
use log::{debug, warn};

use super::{
    ActiveVariable, Attachment, BufferTarget, BufferUsage, FramebufferTarget, GraphicsDevice,
    Handle, PixelFormat, ShaderKind, TextureTarget, UniformLocation, UniformValue,
};
use crate::error::{Error, Result};
use crate::gfx::geometry::{IndexWidth, Primitive};

pub struct GlowDevice {
    gl: glow::Context,
}

impl GlowDevice {
    pub fn new(gl: glow::Context) -> Self {
        unsafe {
            debug!(
                "OpenGL {} ({})",
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::RENDERER)
            );
        }
        Self { gl }
    }

    /// Direct access for calls the device trait does not cover.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

fn buffer(handle: Handle) -> glow::NativeBuffer {
    glow::NativeBuffer(handle)
}

fn texture(handle: Handle) -> glow::NativeTexture {
    glow::NativeTexture(handle)
}

fn renderbuffer(handle: Handle) -> glow::NativeRenderbuffer {
    glow::NativeRenderbuffer(handle)
}

fn framebuffer(handle: Handle) -> glow::NativeFramebuffer {
    glow::NativeFramebuffer(handle)
}

fn shader(handle: Handle) -> glow::NativeShader {
    glow::NativeShader(handle)
}

fn program(handle: Handle) -> glow::NativeProgram {
    glow::NativeProgram(handle)
}

fn vertex_array(handle: Handle) -> glow::NativeVertexArray {
    glow::NativeVertexArray(handle)
}

impl GraphicsDevice for GlowDevice {
    fn create_buffer(&mut self) -> Result<Handle> {
        let b = unsafe { self.gl.create_buffer() }.map_err(Error::Device)?;
        Ok(b.0)
    }

    fn delete_buffer(&mut self, b: Handle) {
        unsafe { self.gl.delete_buffer(buffer(b)) }
    }

    fn bind_buffer(&mut self, target: BufferTarget, b: Option<Handle>) {
        unsafe { self.gl.bind_buffer(target.gl_enum(), b.map(buffer)) }
    }

    fn bind_buffer_base(&mut self, target: BufferTarget, index: u32, b: Option<Handle>) {
        unsafe { self.gl.bind_buffer_base(target.gl_enum(), index, b.map(buffer)) }
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe { self.gl.buffer_data_u8_slice(target.gl_enum(), data, usage.gl_enum()) }
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target.gl_enum(), offset as i32, data) }
    }

    fn create_vertex_array(&mut self) -> Result<Handle> {
        let vao = unsafe { self.gl.create_vertex_array() }.map_err(Error::Device)?;
        Ok(vao.0)
    }

    fn delete_vertex_array(&mut self, vao: Handle) {
        unsafe { self.gl.delete_vertex_array(vertex_array(vao)) }
    }

    fn bind_vertex_array(&mut self, vao: Option<Handle>) {
        unsafe { self.gl.bind_vertex_array(vao.map(vertex_array)) }
    }

    fn enable_vertex_attrib_array(&mut self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) }
    }

    fn disable_vertex_attrib_array(&mut self, location: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(location) }
    }

    fn vertex_attrib_pointer_f32(&mut self, location: u32, size: i32, normalized: bool, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(location, size, glow::FLOAT, normalized, stride, offset)
        }
    }

    fn vertex_attrib_f32(&mut self, location: u32, values: &[f32]) {
        unsafe {
            match *values {
                [x] => self.gl.vertex_attrib_1_f32(location, x),
                [x, y] => self.gl.vertex_attrib_2_f32(location, x, y),
                [x, y, z] => self.gl.vertex_attrib_3_f32(location, x, y, z),
                [x, y, z, w, ..] => self.gl.vertex_attrib_4_f32(location, x, y, z, w),
                [] => warn!("constant attribute value for location {} has no components", location),
            }
        }
    }

    fn create_texture(&mut self) -> Result<Handle> {
        let t = unsafe { self.gl.create_texture() }.map_err(Error::Device)?;
        Ok(t.0)
    }

    fn delete_texture(&mut self, t: Handle) {
        unsafe { self.gl.delete_texture(texture(t)) }
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&mut self, target: TextureTarget, t: Option<Handle>) {
        unsafe { self.gl.bind_texture(target.gl_enum(), t.map(texture)) }
    }

    fn tex_image_2d(
        &mut self,
        target: TextureTarget,
        level: i32,
        internal_format: PixelFormat,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Option<&[u8]>,
    ) {
        let ty = match format {
            PixelFormat::Depth => glow::FLOAT,
            _ => glow::UNSIGNED_BYTE,
        };
        unsafe {
            self.gl.tex_image_2d(
                target.gl_enum(),
                level,
                internal_format.gl_enum() as i32,
                width as i32,
                height as i32,
                0,
                format.gl_enum(),
                ty,
                pixels,
            )
        }
    }

    fn tex_parameter_i32(&mut self, target: TextureTarget, parameter: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target.gl_enum(), parameter, value) }
    }

    fn pixel_store_i32(&mut self, parameter: u32, value: i32) {
        unsafe { self.gl.pixel_store_i32(parameter, value) }
    }

    fn generate_mipmap(&mut self, target: TextureTarget) {
        unsafe { self.gl.generate_mipmap(target.gl_enum()) }
    }

    fn create_renderbuffer(&mut self) -> Result<Handle> {
        let rb = unsafe { self.gl.create_renderbuffer() }.map_err(Error::Device)?;
        Ok(rb.0)
    }

    fn delete_renderbuffer(&mut self, rb: Handle) {
        unsafe { self.gl.delete_renderbuffer(renderbuffer(rb)) }
    }

    fn bind_renderbuffer(&mut self, rb: Option<Handle>) {
        unsafe { self.gl.bind_renderbuffer(glow::RENDERBUFFER, rb.map(renderbuffer)) }
    }

    fn renderbuffer_storage(&mut self, internal_format: u32, width: u32, height: u32, samples: u32) {
        unsafe {
            if samples == 0 {
                self.gl
                    .renderbuffer_storage(glow::RENDERBUFFER, internal_format, width as i32, height as i32)
            } else {
                self.gl.renderbuffer_storage_multisample(
                    glow::RENDERBUFFER,
                    samples as i32,
                    internal_format,
                    width as i32,
                    height as i32,
                )
            }
        }
    }

    fn create_framebuffer(&mut self) -> Result<Handle> {
        let fb = unsafe { self.gl.create_framebuffer() }.map_err(Error::Device)?;
        Ok(fb.0)
    }

    fn delete_framebuffer(&mut self, fb: Handle) {
        unsafe { self.gl.delete_framebuffer(framebuffer(fb)) }
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, fb: Option<Handle>) {
        unsafe { self.gl.bind_framebuffer(target.gl_enum(), fb.map(framebuffer)) }
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        texture_target: TextureTarget,
        t: Option<Handle>,
        level: i32,
    ) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                target.gl_enum(),
                attachment.gl_enum(),
                texture_target.gl_enum(),
                t.map(texture),
                level,
            )
        }
    }

    fn framebuffer_renderbuffer(&mut self, target: FramebufferTarget, attachment: Attachment, rb: Option<Handle>) {
        unsafe {
            self.gl.framebuffer_renderbuffer(
                target.gl_enum(),
                attachment.gl_enum(),
                glow::RENDERBUFFER,
                rb.map(renderbuffer),
            )
        }
    }

    fn check_framebuffer_status(&mut self, target: FramebufferTarget) -> u32 {
        unsafe { self.gl.check_framebuffer_status(target.gl_enum()) }
    }

    fn create_shader(&mut self, kind: ShaderKind) -> Result<Handle> {
        let s = unsafe { self.gl.create_shader(kind.gl_enum()) }.map_err(Error::Device)?;
        Ok(s.0)
    }

    fn shader_source(&mut self, s: Handle, source: &str) {
        unsafe { self.gl.shader_source(shader(s), source) }
    }

    fn compile_shader(&mut self, s: Handle) {
        unsafe { self.gl.compile_shader(shader(s)) }
    }

    fn shader_compile_status(&self, s: Handle) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader(s)) }
    }

    fn shader_info_log(&self, s: Handle) -> String {
        unsafe { self.gl.get_shader_info_log(shader(s)) }
    }

    fn delete_shader(&mut self, s: Handle) {
        unsafe { self.gl.delete_shader(shader(s)) }
    }

    fn create_program(&mut self) -> Result<Handle> {
        let p = unsafe { self.gl.create_program() }.map_err(Error::Device)?;
        Ok(p.0)
    }

    fn attach_shader(&mut self, p: Handle, s: Handle) {
        unsafe { self.gl.attach_shader(program(p), shader(s)) }
    }

    fn detach_shader(&mut self, p: Handle, s: Handle) {
        unsafe { self.gl.detach_shader(program(p), shader(s)) }
    }

    fn link_program(&mut self, p: Handle) {
        unsafe { self.gl.link_program(program(p)) }
    }

    fn program_link_status(&self, p: Handle) -> bool {
        unsafe { self.gl.get_program_link_status(program(p)) }
    }

    // glow exposes no glValidateProgram entry point; a linked program is
    // reported as valid.
    fn validate_program(&mut self, _p: Handle) {}

    fn program_validate_status(&self, p: Handle) -> bool {
        self.program_link_status(p)
    }

    fn program_info_log(&self, p: Handle) -> String {
        unsafe { self.gl.get_program_info_log(program(p)) }
    }

    fn use_program(&mut self, p: Option<Handle>) {
        unsafe { self.gl.use_program(p.map(program)) }
    }

    fn delete_program(&mut self, p: Handle) {
        unsafe { self.gl.delete_program(program(p)) }
    }

    fn active_attributes(&self, p: Handle) -> Vec<ActiveVariable> {
        unsafe {
            let count = self.gl.get_active_attributes(program(p));
            (0..count)
                .filter_map(|i| self.gl.get_active_attribute(program(p), i))
                .map(|a| ActiveVariable {
                    name: a.name,
                    size: a.size,
                    gl_type: a.atype,
                })
                .collect()
        }
    }

    fn active_uniforms(&self, p: Handle) -> Vec<ActiveVariable> {
        unsafe {
            let count = self.gl.get_active_uniforms(program(p));
            (0..count)
                .filter_map(|i| self.gl.get_active_uniform(program(p), i))
                .map(|u| ActiveVariable {
                    name: u.name,
                    size: u.size,
                    gl_type: u.utype,
                })
                .collect()
        }
    }

    fn attrib_location(&self, p: Handle, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program(p), name) }
    }

    fn uniform_location(&self, p: Handle, name: &str) -> Option<UniformLocation> {
        unsafe { self.gl.get_uniform_location(program(p), name).map(|l| l.0) }
    }

    fn uniform_block_index(&self, p: Handle, name: &str) -> Option<u32> {
        unsafe { self.gl.get_uniform_block_index(program(p), name) }
    }

    fn uniform_block_binding(&mut self, p: Handle, block_index: u32, binding: u32) {
        unsafe { self.gl.uniform_block_binding(program(p), block_index, binding) }
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let location = glow::NativeUniformLocation(location);
        let location = Some(&location);
        unsafe {
            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, v),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32_slice(location, &v),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32_slice(location, &v),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32_slice(location, &v),
                UniformValue::Mat4(v) => self.gl.uniform_matrix_4_f32_slice(location, false, &v),
            }
        }
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear(&mut self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn draw_arrays(&mut self, mode: Primitive, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode.gl_enum(), first, count) }
    }

    fn draw_elements(&mut self, mode: Primitive, count: i32, index_width: IndexWidth, offset: i32) {
        unsafe {
            self.gl
                .draw_elements(mode.gl_enum(), count, index_width.gl_enum(), offset)
        }
    }
}
