//! Software [`GraphicsDevice`] that keeps every piece of state in memory.
//!
//! Nothing is rendered. The device allocates handles, stores uploaded bytes,
//! tracks bindings and counts calls so tests can assert on what the resource
//! wrappers asked for. Shader "compilation" fails when the source is empty or
//! contains an `#error` directive; active attributes and uniforms are found by
//! scanning the GLSL declarations of the attached shaders.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;

use log::trace;

use super::{
    ActiveVariable, Attachment, BufferTarget, BufferUsage, FramebufferTarget, GraphicsDevice,
    Handle, PixelFormat, ShaderKind, TextureTarget, UniformLocation, UniformValue,
};
use crate::error::{Error, Result};
use crate::gfx::geometry::{IndexWidth, Primitive};

#[derive(Debug, Clone, Default)]
pub struct TextureState {
    pub width: u32,
    pub height: u32,
    pub format: Option<PixelFormat>,
    pub pixels: Vec<u8>,
    pub parameters: HashMap<u32, i32>,
    pub mipmapped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderbufferState {
    pub internal_format: u32,
    pub width: u32,
    pub height: u32,
    pub samples: u32,
}

#[derive(Debug, Clone)]
struct ShaderState {
    kind: ShaderKind,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Clone, Default)]
struct ProgramState {
    attached: Vec<Handle>,
    linked: bool,
    validated: bool,
    log: String,
    attributes: Vec<ActiveVariable>,
    uniforms: Vec<ActiveVariable>,
    uniform_blocks: Vec<String>,
    block_bindings: HashMap<u32, u32>,
    values: HashMap<UniformLocation, UniformValue>,
}

/// A recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub mode: Primitive,
    pub first: i32,
    pub count: i32,
    /// `None` for `draw_arrays`.
    pub index_width: Option<IndexWidth>,
    pub program: Option<Handle>,
    pub vertex_array: Option<Handle>,
}

#[derive(Debug, Default)]
pub struct HeadlessDevice {
    next_handle: u32,
    calls: HashMap<&'static str, usize>,

    buffers: HashMap<Handle, Vec<u8>>,
    bound_buffers: HashMap<BufferTarget, Handle>,
    indexed_buffers: HashMap<(BufferTarget, u32), Handle>,

    vertex_arrays: HashSet<Handle>,
    bound_vertex_array: Option<Handle>,
    enabled_attributes: HashSet<u32>,
    attribute_pointers: HashMap<u32, (i32, i32, i32)>,
    attribute_constants: HashMap<u32, Vec<f32>>,

    textures: HashMap<Handle, TextureState>,
    active_unit: u32,
    bound_textures: HashMap<(u32, TextureTarget), Handle>,
    pixel_store: HashMap<u32, i32>,

    renderbuffers: HashMap<Handle, RenderbufferState>,
    bound_renderbuffer: Option<Handle>,

    framebuffers: HashMap<Handle, HashMap<Attachment, Handle>>,
    bound_framebuffers: HashMap<FramebufferTarget, Handle>,

    shaders: HashMap<Handle, ShaderState>,
    programs: HashMap<Handle, ProgramState>,
    current_program: Option<Handle>,

    viewport: [i32; 4],
    clear_color: [f32; 4],
    draws: Vec<DrawCall>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, name: &'static str) {
        *self.calls.entry(name).or_insert(0) += 1;
    }

    fn allocate(&mut self) -> Result<Handle> {
        self.next_handle += 1;
        NonZeroU32::new(self.next_handle).ok_or_else(|| Error::Device("handle space exhausted".into()))
    }

    /// Number of times the named trait method was called.
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.get(name).copied().unwrap_or(0)
    }

    /// True while `handle` names an object that has not been deleted.
    pub fn is_live(&self, handle: Handle) -> bool {
        self.buffers.contains_key(&handle)
            || self.vertex_arrays.contains(&handle)
            || self.textures.contains_key(&handle)
            || self.renderbuffers.contains_key(&handle)
            || self.framebuffers.contains_key(&handle)
            || self.shaders.contains_key(&handle)
            || self.programs.contains_key(&handle)
    }

    pub fn live_object_count(&self) -> usize {
        self.buffers.len()
            + self.vertex_arrays.len()
            + self.textures.len()
            + self.renderbuffers.len()
            + self.framebuffers.len()
            + self.shaders.len()
            + self.programs.len()
    }

    pub fn buffer_contents(&self, buffer: Handle) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(|b| b.as_slice())
    }

    pub fn bound_buffer(&self, target: BufferTarget) -> Option<Handle> {
        self.bound_buffers.get(&target).copied()
    }

    pub fn buffer_at_index(&self, target: BufferTarget, index: u32) -> Option<Handle> {
        self.indexed_buffers.get(&(target, index)).copied()
    }

    pub fn bound_vertex_array(&self) -> Option<Handle> {
        self.bound_vertex_array
    }

    pub fn is_attribute_enabled(&self, location: u32) -> bool {
        self.enabled_attributes.contains(&location)
    }

    /// `(size, stride, offset)` of the pointer set for `location`.
    pub fn attribute_pointer(&self, location: u32) -> Option<(i32, i32, i32)> {
        self.attribute_pointers.get(&location).copied()
    }

    pub fn attribute_constant(&self, location: u32) -> Option<&[f32]> {
        self.attribute_constants.get(&location).map(|v| v.as_slice())
    }

    pub fn texture(&self, texture: Handle) -> Option<&TextureState> {
        self.textures.get(&texture)
    }

    pub fn bound_texture(&self, unit: u32, target: TextureTarget) -> Option<Handle> {
        self.bound_textures.get(&(unit, target)).copied()
    }

    pub fn pixel_store(&self, parameter: u32) -> Option<i32> {
        self.pixel_store.get(&parameter).copied()
    }

    pub fn renderbuffer(&self, renderbuffer: Handle) -> Option<RenderbufferState> {
        self.renderbuffers.get(&renderbuffer).copied()
    }

    pub fn framebuffer_attachment(&self, framebuffer: Handle, attachment: Attachment) -> Option<Handle> {
        self.framebuffers
            .get(&framebuffer)
            .and_then(|attachments| attachments.get(&attachment).copied())
    }

    pub fn bound_framebuffer(&self, target: FramebufferTarget) -> Option<Handle> {
        self.bound_framebuffers.get(&target).copied()
    }

    pub fn shader_source_of(&self, shader: Handle) -> Option<&str> {
        self.shaders.get(&shader).map(|s| s.source.as_str())
    }

    pub fn attached_shaders(&self, program: Handle) -> Vec<Handle> {
        self.programs
            .get(&program)
            .map(|p| p.attached.clone())
            .unwrap_or_default()
    }

    pub fn current_program(&self) -> Option<Handle> {
        self.current_program
    }

    /// Last value written to the named uniform of `program`.
    pub fn uniform_value(&self, program: Handle, name: &str) -> Option<UniformValue> {
        let location = self.uniform_location(program, name)?;
        self.programs.get(&program)?.values.get(&location).copied()
    }

    pub fn uniform_block_binding_of(&self, program: Handle, block_index: u32) -> Option<u32> {
        self.programs.get(&program)?.block_bindings.get(&block_index).copied()
    }

    pub fn viewport_rect(&self) -> [i32; 4] {
        self.viewport
    }

    pub fn clear_color_value(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draws
    }

    fn bound_framebuffer_for(&self, target: FramebufferTarget) -> Option<Handle> {
        self.bound_framebuffers
            .get(&target)
            .or_else(|| self.bound_framebuffers.get(&FramebufferTarget::Framebuffer))
            .copied()
    }

    fn attach(&mut self, target: FramebufferTarget, attachment: Attachment, object: Option<Handle>) {
        let Some(framebuffer) = self.bound_framebuffer_for(target) else {
            return;
        };
        if let Some(attachments) = self.framebuffers.get_mut(&framebuffer) {
            match object {
                Some(handle) => attachments.insert(attachment, handle),
                None => attachments.remove(&attachment),
            };
        }
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_buffer(&mut self) -> Result<Handle> {
        self.record("create_buffer");
        let handle = self.allocate()?;
        self.buffers.insert(handle, Vec::new());
        Ok(handle)
    }

    fn delete_buffer(&mut self, buffer: Handle) {
        self.record("delete_buffer");
        self.buffers.remove(&buffer);
        self.bound_buffers.retain(|_, b| *b != buffer);
        self.indexed_buffers.retain(|_, b| *b != buffer);
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<Handle>) {
        self.record("bind_buffer");
        match buffer {
            Some(handle) => self.bound_buffers.insert(target, handle),
            None => self.bound_buffers.remove(&target),
        };
    }

    fn bind_buffer_base(&mut self, target: BufferTarget, index: u32, buffer: Option<Handle>) {
        self.record("bind_buffer_base");
        match buffer {
            Some(handle) => {
                self.indexed_buffers.insert((target, index), handle);
                self.bound_buffers.insert(target, handle);
            }
            None => {
                self.indexed_buffers.remove(&(target, index));
            }
        }
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], _usage: BufferUsage) {
        self.record("buffer_data");
        if let Some(buffer) = self.bound_buffers.get(&target) {
            if let Some(contents) = self.buffers.get_mut(buffer) {
                *contents = data.to_vec();
            }
        }
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        self.record("buffer_sub_data");
        if let Some(buffer) = self.bound_buffers.get(&target) {
            if let Some(contents) = self.buffers.get_mut(buffer) {
                let end = offset + data.len();
                if contents.len() < end {
                    contents.resize(end, 0);
                }
                contents[offset..end].copy_from_slice(data);
            }
        }
    }

    fn create_vertex_array(&mut self) -> Result<Handle> {
        self.record("create_vertex_array");
        let handle = self.allocate()?;
        self.vertex_arrays.insert(handle);
        Ok(handle)
    }

    fn delete_vertex_array(&mut self, vertex_array: Handle) {
        self.record("delete_vertex_array");
        self.vertex_arrays.remove(&vertex_array);
        if self.bound_vertex_array == Some(vertex_array) {
            self.bound_vertex_array = None;
        }
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<Handle>) {
        self.record("bind_vertex_array");
        self.bound_vertex_array = vertex_array;
    }

    fn enable_vertex_attrib_array(&mut self, location: u32) {
        self.record("enable_vertex_attrib_array");
        self.enabled_attributes.insert(location);
    }

    fn disable_vertex_attrib_array(&mut self, location: u32) {
        self.record("disable_vertex_attrib_array");
        self.enabled_attributes.remove(&location);
    }

    fn vertex_attrib_pointer_f32(&mut self, location: u32, size: i32, _normalized: bool, stride: i32, offset: i32) {
        self.record("vertex_attrib_pointer_f32");
        self.attribute_pointers.insert(location, (size, stride, offset));
    }

    fn vertex_attrib_f32(&mut self, location: u32, values: &[f32]) {
        self.record("vertex_attrib_f32");
        self.attribute_constants.insert(location, values.to_vec());
    }

    fn create_texture(&mut self) -> Result<Handle> {
        self.record("create_texture");
        let handle = self.allocate()?;
        self.textures.insert(handle, TextureState::default());
        Ok(handle)
    }

    fn delete_texture(&mut self, texture: Handle) {
        self.record("delete_texture");
        self.textures.remove(&texture);
        self.bound_textures.retain(|_, t| *t != texture);
    }

    fn active_texture(&mut self, unit: u32) {
        self.record("active_texture");
        self.active_unit = unit;
    }

    fn bind_texture(&mut self, target: TextureTarget, texture: Option<Handle>) {
        self.record("bind_texture");
        let key = (self.active_unit, target);
        match texture {
            Some(handle) => self.bound_textures.insert(key, handle),
            None => self.bound_textures.remove(&key),
        };
    }

    fn tex_image_2d(
        &mut self,
        target: TextureTarget,
        _level: i32,
        internal_format: PixelFormat,
        width: u32,
        height: u32,
        _format: PixelFormat,
        pixels: Option<&[u8]>,
    ) {
        self.record("tex_image_2d");
        let Some(texture) = self.bound_textures.get(&(self.active_unit, target)).copied() else {
            return;
        };
        if let Some(state) = self.textures.get_mut(&texture) {
            state.width = width;
            state.height = height;
            state.format = Some(internal_format);
            state.pixels = pixels.map(|p| p.to_vec()).unwrap_or_default();
        }
    }

    fn tex_parameter_i32(&mut self, target: TextureTarget, parameter: u32, value: i32) {
        self.record("tex_parameter_i32");
        let Some(texture) = self.bound_textures.get(&(self.active_unit, target)).copied() else {
            return;
        };
        if let Some(state) = self.textures.get_mut(&texture) {
            state.parameters.insert(parameter, value);
        }
    }

    fn pixel_store_i32(&mut self, parameter: u32, value: i32) {
        self.record("pixel_store_i32");
        self.pixel_store.insert(parameter, value);
    }

    fn generate_mipmap(&mut self, target: TextureTarget) {
        self.record("generate_mipmap");
        let Some(texture) = self.bound_textures.get(&(self.active_unit, target)).copied() else {
            return;
        };
        if let Some(state) = self.textures.get_mut(&texture) {
            state.mipmapped = true;
        }
    }

    fn create_renderbuffer(&mut self) -> Result<Handle> {
        self.record("create_renderbuffer");
        let handle = self.allocate()?;
        self.renderbuffers.insert(handle, RenderbufferState::default());
        Ok(handle)
    }

    fn delete_renderbuffer(&mut self, renderbuffer: Handle) {
        self.record("delete_renderbuffer");
        self.renderbuffers.remove(&renderbuffer);
        if self.bound_renderbuffer == Some(renderbuffer) {
            self.bound_renderbuffer = None;
        }
    }

    fn bind_renderbuffer(&mut self, renderbuffer: Option<Handle>) {
        self.record("bind_renderbuffer");
        self.bound_renderbuffer = renderbuffer;
    }

    fn renderbuffer_storage(&mut self, internal_format: u32, width: u32, height: u32, samples: u32) {
        self.record("renderbuffer_storage");
        let Some(renderbuffer) = self.bound_renderbuffer else {
            return;
        };
        if let Some(state) = self.renderbuffers.get_mut(&renderbuffer) {
            *state = RenderbufferState {
                internal_format,
                width,
                height,
                samples,
            };
        }
    }

    fn create_framebuffer(&mut self) -> Result<Handle> {
        self.record("create_framebuffer");
        let handle = self.allocate()?;
        self.framebuffers.insert(handle, HashMap::new());
        Ok(handle)
    }

    fn delete_framebuffer(&mut self, framebuffer: Handle) {
        self.record("delete_framebuffer");
        self.framebuffers.remove(&framebuffer);
        self.bound_framebuffers.retain(|_, f| *f != framebuffer);
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<Handle>) {
        self.record("bind_framebuffer");
        match framebuffer {
            Some(handle) => self.bound_framebuffers.insert(target, handle),
            None => self.bound_framebuffers.remove(&target),
        };
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        _texture_target: TextureTarget,
        texture: Option<Handle>,
        _level: i32,
    ) {
        self.record("framebuffer_texture_2d");
        self.attach(target, attachment, texture);
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        renderbuffer: Option<Handle>,
    ) {
        self.record("framebuffer_renderbuffer");
        self.attach(target, attachment, renderbuffer);
    }

    fn check_framebuffer_status(&mut self, target: FramebufferTarget) -> u32 {
        self.record("check_framebuffer_status");
        match self.bound_framebuffer_for(target) {
            // The default framebuffer is always complete.
            None => glow::FRAMEBUFFER_COMPLETE,
            Some(framebuffer) => match self.framebuffers.get(&framebuffer) {
                Some(attachments) if !attachments.is_empty() => glow::FRAMEBUFFER_COMPLETE,
                _ => glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT,
            },
        }
    }

    fn create_shader(&mut self, kind: ShaderKind) -> Result<Handle> {
        self.record("create_shader");
        let handle = self.allocate()?;
        self.shaders.insert(
            handle,
            ShaderState {
                kind,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        Ok(handle)
    }

    fn shader_source(&mut self, shader: Handle, source: &str) {
        self.record("shader_source");
        if let Some(state) = self.shaders.get_mut(&shader) {
            state.source = source.to_string();
        }
    }

    fn compile_shader(&mut self, shader: Handle) {
        self.record("compile_shader");
        let Some(state) = self.shaders.get_mut(&shader) else {
            return;
        };
        let error_line = state
            .source
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with("#error"));
        if state.source.trim().is_empty() {
            state.compiled = false;
            state.log = "ERROR: 0:0: empty shader source".to_string();
        } else if let Some(line) = error_line {
            state.compiled = false;
            state.log = format!("ERROR: 0:1: {}", line.trim_start_matches("#error").trim());
        } else {
            state.compiled = true;
            state.log.clear();
        }
        trace!("headless compile of shader {} -> {}", shader, state.compiled);
    }

    fn shader_compile_status(&self, shader: Handle) -> bool {
        self.shaders.get(&shader).map(|s| s.compiled).unwrap_or(false)
    }

    fn shader_info_log(&self, shader: Handle) -> String {
        self.shaders.get(&shader).map(|s| s.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: Handle) {
        self.record("delete_shader");
        self.shaders.remove(&shader);
    }

    fn create_program(&mut self) -> Result<Handle> {
        self.record("create_program");
        let handle = self.allocate()?;
        self.programs.insert(handle, ProgramState::default());
        Ok(handle)
    }

    fn attach_shader(&mut self, program: Handle, shader: Handle) {
        self.record("attach_shader");
        if let Some(state) = self.programs.get_mut(&program) {
            if !state.attached.contains(&shader) {
                state.attached.push(shader);
            }
        }
    }

    fn detach_shader(&mut self, program: Handle, shader: Handle) {
        self.record("detach_shader");
        if let Some(state) = self.programs.get_mut(&program) {
            state.attached.retain(|s| *s != shader);
        }
    }

    fn link_program(&mut self, program: Handle) {
        self.record("link_program");
        let Some(attached) = self.programs.get(&program).map(|p| p.attached.clone()) else {
            return;
        };

        let mut log = String::new();
        let mut attributes = Vec::new();
        let mut uniforms: Vec<ActiveVariable> = Vec::new();
        let mut blocks = Vec::new();

        if attached.is_empty() {
            log = "ERROR: no shaders attached".to_string();
        }
        for shader in &attached {
            match self.shaders.get(shader) {
                Some(state) if state.compiled => {
                    if state.kind == ShaderKind::Vertex {
                        attributes.extend(declarations(&state.source, &["in", "attribute"]));
                    }
                    for uniform in declarations(&state.source, &["uniform"]) {
                        if !uniforms.iter().any(|u| u.name == uniform.name) {
                            uniforms.push(uniform);
                        }
                    }
                    blocks.extend(uniform_blocks(&state.source));
                }
                Some(_) => log = format!("ERROR: shader {} is not compiled", shader),
                None => log = format!("ERROR: shader {} does not exist", shader),
            }
        }

        if let Some(state) = self.programs.get_mut(&program) {
            state.linked = log.is_empty();
            state.log = log;
            if state.linked {
                state.attributes = attributes;
                state.uniforms = uniforms;
                state.uniform_blocks = blocks;
            } else {
                state.attributes.clear();
                state.uniforms.clear();
                state.uniform_blocks.clear();
            }
            state.values.clear();
        }
    }

    fn program_link_status(&self, program: Handle) -> bool {
        self.programs.get(&program).map(|p| p.linked).unwrap_or(false)
    }

    fn validate_program(&mut self, program: Handle) {
        self.record("validate_program");
        if let Some(state) = self.programs.get_mut(&program) {
            state.validated = state.linked;
            if !state.linked {
                state.log = "ERROR: program is not linked".to_string();
            }
        }
    }

    fn program_validate_status(&self, program: Handle) -> bool {
        self.programs.get(&program).map(|p| p.validated).unwrap_or(false)
    }

    fn program_info_log(&self, program: Handle) -> String {
        self.programs.get(&program).map(|p| p.log.clone()).unwrap_or_default()
    }

    fn use_program(&mut self, program: Option<Handle>) {
        self.record("use_program");
        self.current_program = program;
    }

    fn delete_program(&mut self, program: Handle) {
        self.record("delete_program");
        self.programs.remove(&program);
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn active_attributes(&self, program: Handle) -> Vec<ActiveVariable> {
        self.programs.get(&program).map(|p| p.attributes.clone()).unwrap_or_default()
    }

    fn active_uniforms(&self, program: Handle) -> Vec<ActiveVariable> {
        self.programs.get(&program).map(|p| p.uniforms.clone()).unwrap_or_default()
    }

    fn attrib_location(&self, program: Handle, name: &str) -> Option<u32> {
        let state = self.programs.get(&program)?;
        state
            .attributes
            .iter()
            .position(|a| a.name == name)
            .map(|i| i as u32)
    }

    fn uniform_location(&self, program: Handle, name: &str) -> Option<UniformLocation> {
        let state = self.programs.get(&program)?;
        let array_name = format!("{}[0]", name);
        state
            .uniforms
            .iter()
            .position(|u| u.name == name || u.name == array_name)
            .map(|i| i as UniformLocation)
    }

    fn uniform_block_index(&self, program: Handle, name: &str) -> Option<u32> {
        let state = self.programs.get(&program)?;
        state
            .uniform_blocks
            .iter()
            .position(|b| b == name)
            .map(|i| i as u32)
    }

    fn uniform_block_binding(&mut self, program: Handle, block_index: u32, binding: u32) {
        self.record("uniform_block_binding");
        if let Some(state) = self.programs.get_mut(&program) {
            state.block_bindings.insert(block_index, binding);
        }
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        self.record("set_uniform");
        let Some(program) = self.current_program else {
            return;
        };
        if let Some(state) = self.programs.get_mut(&program) {
            if (location as usize) < state.uniforms.len() {
                state.values.insert(location, value);
            }
        }
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record("viewport");
        self.viewport = [x, y, width, height];
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.record("clear_color");
        self.clear_color = [r, g, b, a];
    }

    fn clear(&mut self, _mask: u32) {
        self.record("clear");
    }

    fn draw_arrays(&mut self, mode: Primitive, first: i32, count: i32) {
        self.record("draw_arrays");
        self.draws.push(DrawCall {
            mode,
            first,
            count,
            index_width: None,
            program: self.current_program,
            vertex_array: self.bound_vertex_array,
        });
    }

    fn draw_elements(&mut self, mode: Primitive, count: i32, index_width: IndexWidth, offset: i32) {
        self.record("draw_elements");
        self.draws.push(DrawCall {
            mode,
            first: offset,
            count,
            index_width: Some(index_width),
            program: self.current_program,
            vertex_array: self.bound_vertex_array,
        });
    }
}

fn gl_type_of(glsl_type: &str) -> u32 {
    match glsl_type {
        "float" => glow::FLOAT,
        "vec2" => glow::FLOAT_VEC2,
        "vec3" => glow::FLOAT_VEC3,
        "vec4" => glow::FLOAT_VEC4,
        "mat3" => glow::FLOAT_MAT3,
        "mat4" => glow::FLOAT_MAT4,
        "int" => glow::INT,
        "bool" => glow::BOOL,
        "sampler2D" => glow::SAMPLER_2D,
        "samplerCube" => glow::SAMPLER_CUBE,
        _ => 0,
    }
}

/// Splits GLSL source into tokens, keeping braces and semicolons separate and
/// dropping `//` comments.
fn tokenize(source: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for line in source.lines() {
        let line = line.split("//").next().unwrap_or("");
        let spaced = line.replace('{', " { ").replace('}', " } ").replace(';', " ; ");
        tokens.extend(spaced.split_whitespace().map(str::to_string));
    }
    tokens
}

/// Splits `name[4]` into `("name", Some(4))`.
fn split_array(name: &str) -> (&str, Option<i32>) {
    match name.find('[') {
        Some(open) => {
            let size = name[open + 1..]
                .trim_end_matches(']')
                .parse::<i32>()
                .ok();
            (&name[..open], size)
        }
        None => (name, None),
    }
}

/// Global variables declared with one of `qualifiers`, expanded the way GL
/// reports them: struct members become `var.field`, arrays of structs become
/// `var[i].field`, arrays of plain types are reported once as `var[0]`.
fn declarations(source: &str, qualifiers: &[&str]) -> Vec<ActiveVariable> {
    let tokens = tokenize(source);
    let mut structs: HashMap<String, Vec<(String, String)>> = HashMap::new();
    let mut variables = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "{" => depth += 1,
            "}" => depth = depth.saturating_sub(1),
            "struct" if depth == 0 => {
                let name = tokens.get(i + 1).cloned().unwrap_or_default();
                let mut fields = Vec::new();
                let mut j = i + 3;
                while j + 2 < tokens.len() && tokens[j] != "}" {
                    fields.push((tokens[j].clone(), tokens[j + 1].clone()));
                    j += 3;
                }
                structs.insert(name, fields);
                i = j + 1;
                continue;
            }
            _ if depth == 0 && qualifiers.contains(&token) => {
                let mut j = i + 1;
                while j < tokens.len() && matches!(tokens[j].as_str(), "highp" | "mediump" | "lowp" | "flat") {
                    j += 1;
                }
                if j + 1 >= tokens.len() || tokens[j + 1] == "{" || tokens[j + 1] == ";" {
                    // interface block or malformed declaration
                    i = j + 1;
                    continue;
                }
                expand_declaration(&structs, &tokens[j], &tokens[j + 1], &mut variables);
                i = j + 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    variables
}

fn expand_declaration(
    structs: &HashMap<String, Vec<(String, String)>>,
    glsl_type: &str,
    declarator: &str,
    variables: &mut Vec<ActiveVariable>,
) {
    let (name, array) = split_array(declarator);
    let Some(fields) = structs.get(glsl_type) else {
        variables.push(ActiveVariable {
            name: match array {
                Some(_) => format!("{}[0]", name),
                None => name.to_string(),
            },
            size: array.unwrap_or(1),
            gl_type: gl_type_of(glsl_type),
        });
        return;
    };

    for element in 0..array.unwrap_or(1) {
        let prefix = match array {
            Some(_) => format!("{}[{}]", name, element),
            None => name.to_string(),
        };
        for (field_type, field_name) in fields {
            let (field_name, field_array) = split_array(field_name);
            variables.push(ActiveVariable {
                name: match field_array {
                    Some(_) => format!("{}.{}[0]", prefix, field_name),
                    None => format!("{}.{}", prefix, field_name),
                },
                size: field_array.unwrap_or(1),
                gl_type: gl_type_of(field_type),
            });
        }
    }
}

/// Names of `uniform Block { ... };` interface blocks.
fn uniform_blocks(source: &str) -> Vec<String> {
    let tokens = tokenize(source);
    tokens
        .windows(3)
        .filter(|w| w[0] == "uniform" && w[2] == "{")
        .map(|w| w[1].clone())
        .collect()
}
