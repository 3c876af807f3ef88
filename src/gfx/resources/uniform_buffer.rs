use std::marker::PhantomData;

use log::debug;

use super::{GlBuffer, Program};
use crate::error::Result;
use crate::gfx::device::{BufferTarget, BufferUsage, Context, GraphicsDevice};

/// Typed uniform buffer holding one `#[repr(C)]` value.
pub struct UniformBlock<Content> {
    buffer: GlBuffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

impl<Content: bytemuck::Pod> UniformBlock<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        match type_name.rfind(':') {
            Some(pos) => &type_name[(pos + 1)..],
            None => type_name,
        }
    }

    pub fn new() -> Self {
        UniformBlock {
            buffer: GlBuffer::new(BufferTarget::Uniform, BufferUsage::DynamicDraw),
            content_type: PhantomData,
            previous_content: Vec::new(),
        }
    }

    /// Create block storage with initial data
    pub fn new_with_data<D: GraphicsDevice>(ctx: &mut Context<D>, initial_content: &Content) -> Result<Self> {
        let mut block = Self::new();
        block.force_update_content(ctx, initial_content)?;
        debug!("uniform block {} created ({} bytes)", Self::name(), block.size());
        Ok(block)
    }

    /// Uploads `content` unless it is byte-identical to the last upload.
    /// Returns whether anything was written.
    pub fn update_content<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, content: &Content) -> Result<bool> {
        let new_content = bytemuck::bytes_of(content);
        if self.previous_content == new_content {
            return Ok(false);
        }
        self.force_update_content(ctx, content)?;
        Ok(true)
    }

    pub fn force_update_content<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, content: &Content) -> Result<()> {
        let new_content = bytemuck::bytes_of(content);
        if self.buffer.size() == new_content.len() {
            self.buffer.set_sub_data(ctx, 0, new_content)?;
        } else {
            self.buffer.set_data(ctx, new_content)?;
        }
        self.previous_content = new_content.to_vec();
        Ok(())
    }

    /// Attaches the buffer to uniform binding point `index`.
    pub fn bind_base<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, index: u32) -> Result<()> {
        self.buffer.bind(ctx)?;
        ctx.device_mut()
            .bind_buffer_base(BufferTarget::Uniform, index, self.buffer.handle());
        Ok(())
    }

    /// Points the program's block named `block_name` at binding point `index`.
    /// Returns false when the program has no such block.
    pub fn connect<D: GraphicsDevice>(
        &self,
        ctx: &mut Context<D>,
        program: &Program,
        block_name: &str,
        index: u32,
    ) -> bool {
        let Some(handle) = program.handle() else {
            return false;
        };
        match ctx.device().uniform_block_index(handle, block_name) {
            Some(block) => {
                ctx.device_mut().uniform_block_binding(handle, block, index);
                true
            }
            None => false,
        }
    }

    pub fn buffer(&self) -> &GlBuffer {
        &self.buffer
    }

    pub fn size(&self) -> usize {
        std::mem::size_of::<Content>()
    }

    pub fn delete<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) {
        self.buffer.delete(ctx);
        self.previous_content.clear();
    }
}

impl<Content: bytemuck::Pod> Default for UniformBlock<Content> {
    fn default() -> Self {
        Self::new()
    }
}
