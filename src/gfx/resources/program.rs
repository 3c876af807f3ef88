//! Linked shader programs and their active variables.
//!
//! A successful [`Program::link`] asks the device for every active attribute
//! and uniform and caches them by name. Array uniforms are reported by the
//! device as `name[0]`; [`Program::uniform`] accepts either spelling.

use std::collections::HashMap;

use log::{debug, error, warn};

use super::Shader;
use crate::error::{Error, Result};
use crate::gfx::device::{Context, GraphicsDevice, Handle, UniformLocation, UniformValue};

/// An active vertex attribute of a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Array length, 1 for non-arrays.
    pub size: i32,
    pub gl_type: u32,
    pub location: u32,
}

impl Attribute {
    /// Float components per element, derived from the GLSL type.
    pub fn components(&self) -> i32 {
        match self.gl_type {
            glow::FLOAT => 1,
            glow::FLOAT_VEC2 => 2,
            glow::FLOAT_VEC3 => 3,
            _ => 4,
        }
    }

    pub fn enable<D: GraphicsDevice>(&self, ctx: &mut Context<D>) {
        ctx.device_mut().enable_vertex_attrib_array(self.location);
    }

    pub fn disable<D: GraphicsDevice>(&self, ctx: &mut Context<D>) {
        ctx.device_mut().disable_vertex_attrib_array(self.location);
    }

    /// Sources the attribute from the bound array buffer.
    pub fn set_pointer<D: GraphicsDevice>(
        &self,
        ctx: &mut Context<D>,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        ctx.device_mut()
            .vertex_attrib_pointer_f32(self.location, components, normalized, stride, offset);
    }

    /// Sets a constant value used while the attribute array is disabled.
    pub fn set_constant<D: GraphicsDevice>(&self, ctx: &mut Context<D>, values: &[f32]) {
        ctx.device_mut().vertex_attrib_f32(self.location, values);
    }
}

/// An active uniform of a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uniform {
    pub name: String,
    pub size: i32,
    pub gl_type: u32,
    pub location: UniformLocation,
}

impl Uniform {
    /// Writes `value`. The owning program must be current.
    pub fn set<D: GraphicsDevice>(&self, ctx: &mut Context<D>, value: impl Into<UniformValue>) {
        ctx.device_mut().set_uniform(self.location, value.into());
    }
}

#[derive(Debug, Default)]
pub struct Program {
    handle: Option<Handle>,
    attached: Vec<Shader>,
    attributes: HashMap<String, Attribute>,
    uniforms: HashMap<String, Uniform>,
    log: Option<String>,
    linked: bool,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Diagnostic from the last failed link or validation.
    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn uniform(&self, name: &str) -> Option<&Uniform> {
        self.uniforms
            .get(name)
            .or_else(|| self.uniforms.get(&format!("{}[0]", name)))
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn uniforms(&self) -> impl Iterator<Item = &Uniform> {
        self.uniforms.values()
    }

    pub fn attached(&self) -> &[Shader] {
        &self.attached
    }

    fn ensure_handle<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Result<Handle> {
        if let Some(handle) = self.handle {
            return Ok(handle);
        }
        let handle = ctx.device_mut().create_program()?;
        self.handle = Some(handle);
        Ok(handle)
    }

    /// Takes ownership of a compiled shader and attaches it.
    pub fn attach<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, shader: Shader) -> Result<()> {
        let Some(shader_handle) = shader.handle() else {
            return Err(Error::Link {
                log: "cannot attach a shader that has not compiled".to_string(),
            });
        };
        let handle = self.ensure_handle(ctx)?;
        ctx.device_mut().attach_shader(handle, shader_handle);
        self.attached.push(shader);
        Ok(())
    }

    /// Detaches the shader with `shader_handle` and hands it back.
    pub fn detach<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, shader_handle: Handle) -> Option<Shader> {
        let handle = self.handle?;
        let position = self
            .attached
            .iter()
            .position(|s| s.handle() == Some(shader_handle))?;
        ctx.device_mut().detach_shader(handle, shader_handle);
        Some(self.attached.remove(position))
    }

    pub fn detach_all<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Vec<Shader> {
        if let Some(handle) = self.handle {
            for shader in &self.attached {
                if let Some(shader_handle) = shader.handle() {
                    ctx.device_mut().detach_shader(handle, shader_handle);
                }
            }
        }
        std::mem::take(&mut self.attached)
    }

    /// Links the attached shaders and discovers active attributes and
    /// uniforms. On failure the log is kept and returned in the error.
    pub fn link<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Result<()> {
        let handle = self.ensure_handle(ctx)?;
        ctx.device_mut().link_program(handle);
        self.attributes.clear();
        self.uniforms.clear();

        if !ctx.device().program_link_status(handle) {
            let log = ctx.device().program_info_log(handle);
            error!("program {} failed to link: {}", handle, log);
            self.linked = false;
            self.log = Some(log.clone());
            return Err(Error::Link { log });
        }

        let device = ctx.device();
        for active in device.active_attributes(handle) {
            match device.attrib_location(handle, &active.name) {
                Some(location) => {
                    self.attributes.insert(
                        active.name.clone(),
                        Attribute {
                            name: active.name,
                            size: active.size,
                            gl_type: active.gl_type,
                            location,
                        },
                    );
                }
                None => debug!("attribute {} has no location", active.name),
            }
        }
        for active in device.active_uniforms(handle) {
            match device.uniform_location(handle, &active.name) {
                Some(location) => {
                    self.uniforms.insert(
                        active.name.clone(),
                        Uniform {
                            name: active.name,
                            size: active.size,
                            gl_type: active.gl_type,
                            location,
                        },
                    );
                }
                None => debug!("uniform {} lives in a block", active.name),
            }
        }

        debug!(
            "linked program {}: {} attributes, {} uniforms",
            handle,
            self.attributes.len(),
            self.uniforms.len()
        );
        self.linked = true;
        self.log = None;
        Ok(())
    }

    pub fn validate<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Result<()> {
        let handle = self.ensure_handle(ctx)?;
        ctx.device_mut().validate_program(handle);
        if !ctx.device().program_validate_status(handle) {
            let log = ctx.device().program_info_log(handle);
            self.log = Some(log.clone());
            return Err(Error::Validate { log });
        }
        self.log = None;
        Ok(())
    }

    /// Makes this program current through the context cache.
    pub fn bind<D: GraphicsDevice>(&self, ctx: &mut Context<D>) {
        if self.handle.is_none() {
            warn!("binding a program that was never created");
        }
        ctx.use_program(self.handle);
    }

    pub fn unbind<D: GraphicsDevice>(&self, ctx: &mut Context<D>) {
        ctx.use_program(None);
    }

    /// Binds the program and writes the named uniform. Returns false when the
    /// program has no active uniform of that name.
    pub fn set_uniform<D: GraphicsDevice>(
        &self,
        ctx: &mut Context<D>,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> bool {
        match self.uniform(name) {
            Some(uniform) => {
                self.bind(ctx);
                uniform.set(ctx, value);
                true
            }
            None => false,
        }
    }

    /// Frees the program. With `delete_attached` the shaders are deleted too;
    /// otherwise they are detached and returned.
    pub fn delete<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, delete_attached: bool) -> Vec<Shader> {
        let mut shaders = self.detach_all(ctx);
        if delete_attached {
            for shader in &mut shaders {
                shader.delete(ctx);
            }
            shaders.clear();
        }
        if let Some(handle) = self.handle.take() {
            ctx.device_mut().delete_program(handle);
            ctx.forget_program(handle);
        }
        self.attributes.clear();
        self.uniforms.clear();
        self.linked = false;
        shaders
    }
}
