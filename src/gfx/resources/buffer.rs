use log::trace;

use crate::error::Result;
use crate::gfx::device::{BufferTarget, BufferUsage, Context, GraphicsDevice, Handle};

/// A device buffer object. The handle is created on first bind.
#[derive(Debug)]
pub struct GlBuffer {
    target: BufferTarget,
    usage: BufferUsage,
    handle: Option<Handle>,
    size: usize,
}

impl GlBuffer {
    pub fn new(target: BufferTarget, usage: BufferUsage) -> Self {
        Self {
            target,
            usage,
            handle: None,
            size: 0,
        }
    }

    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn set_target(&mut self, target: BufferTarget) {
        self.target = target;
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn set_usage(&mut self, usage: BufferUsage) {
        self.usage = usage;
    }

    /// Bytes allocated by the last [`set_data`](Self::set_data).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn bind<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Result<()> {
        let handle = match self.handle {
            Some(handle) => handle,
            None => {
                let handle = ctx.device_mut().create_buffer()?;
                trace!("created {:?} buffer {}", self.target, handle);
                self.handle = Some(handle);
                handle
            }
        };
        ctx.device_mut().bind_buffer(self.target, Some(handle));
        Ok(())
    }

    pub fn unbind<D: GraphicsDevice>(&self, ctx: &mut Context<D>) {
        ctx.device_mut().bind_buffer(self.target, None);
    }

    /// Binds the buffer and replaces its whole store with `data`.
    pub fn set_data<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, data: &[u8]) -> Result<()> {
        self.bind(ctx)?;
        ctx.device_mut().buffer_data(self.target, data, self.usage);
        self.size = data.len();
        Ok(())
    }

    /// Binds the buffer and overwrites `data.len()` bytes at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the write would run past the allocated store.
    pub fn set_sub_data<D: GraphicsDevice>(
        &mut self,
        ctx: &mut Context<D>,
        offset: usize,
        data: &[u8],
    ) -> Result<()> {
        assert!(
            offset + data.len() <= self.size,
            "sub-data write of {} bytes at {} exceeds buffer size {}",
            data.len(),
            offset,
            self.size
        );
        self.bind(ctx)?;
        ctx.device_mut().buffer_sub_data(self.target, offset, data);
        Ok(())
    }

    /// Frees the device object. Deleting twice is a no-op.
    pub fn delete<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) {
        if let Some(handle) = self.handle.take() {
            ctx.device_mut().delete_buffer(handle);
            self.size = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::device::HeadlessDevice;

    #[test]
    fn test_lazy_allocation() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut buffer = GlBuffer::new(BufferTarget::Array, BufferUsage::StaticDraw);
        assert!(buffer.handle().is_none());
        assert_eq!(ctx.device().call_count("create_buffer"), 0);

        buffer.bind(&mut ctx).unwrap();
        buffer.bind(&mut ctx).unwrap();
        assert_eq!(ctx.device().call_count("create_buffer"), 1);
        assert_eq!(ctx.device().bound_buffer(BufferTarget::Array), buffer.handle());
    }

    #[test]
    fn test_data_upload() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut buffer = GlBuffer::new(BufferTarget::Array, BufferUsage::DynamicDraw);
        buffer.set_data(&mut ctx, &[1, 2, 3, 4]).unwrap();
        buffer.set_sub_data(&mut ctx, 2, &[9, 9]).unwrap();

        let handle = buffer.handle().unwrap();
        assert_eq!(ctx.device().buffer_contents(handle), Some(&[1, 2, 9, 9][..]));
        assert_eq!(buffer.size(), 4);
    }

    #[test]
    #[should_panic(expected = "exceeds buffer size")]
    fn test_sub_data_bounds() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut buffer = GlBuffer::new(BufferTarget::Array, BufferUsage::StaticDraw);
        buffer.set_data(&mut ctx, &[0; 4]).unwrap();
        let _ = buffer.set_sub_data(&mut ctx, 3, &[1, 2]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut buffer = GlBuffer::new(BufferTarget::ElementArray, BufferUsage::StaticDraw);
        buffer.bind(&mut ctx).unwrap();
        let handle = buffer.handle().unwrap();

        buffer.delete(&mut ctx);
        buffer.delete(&mut ctx);
        assert_eq!(ctx.device().call_count("delete_buffer"), 1);
        assert!(!ctx.device().is_live(handle));
        assert!(buffer.handle().is_none());
    }
}
