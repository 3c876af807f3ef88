use crate::error::Result;
use crate::gfx::device::{Context, GraphicsDevice, Handle};

/// Off-screen render target storage that is never sampled.
#[derive(Debug, Default)]
pub struct Renderbuffer {
    handle: Option<Handle>,
    width: u32,
    height: u32,
    samples: u32,
}

impl Renderbuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 0 for single-sampled storage.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn bind<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Result<()> {
        let handle = match self.handle {
            Some(handle) => handle,
            None => {
                let handle = ctx.device_mut().create_renderbuffer()?;
                self.handle = Some(handle);
                handle
            }
        };
        ctx.device_mut().bind_renderbuffer(Some(handle));
        Ok(())
    }

    pub fn unbind<D: GraphicsDevice>(&self, ctx: &mut Context<D>) {
        ctx.device_mut().bind_renderbuffer(None);
    }

    /// Allocates single-sampled storage, e.g. `glow::DEPTH_COMPONENT24`.
    pub fn storage<D: GraphicsDevice>(
        &mut self,
        ctx: &mut Context<D>,
        internal_format: u32,
        width: u32,
        height: u32,
    ) -> Result<()> {
        self.storage_multisample(ctx, 0, internal_format, width, height)
    }

    pub fn storage_multisample<D: GraphicsDevice>(
        &mut self,
        ctx: &mut Context<D>,
        samples: u32,
        internal_format: u32,
        width: u32,
        height: u32,
    ) -> Result<()> {
        self.bind(ctx)?;
        ctx.device_mut()
            .renderbuffer_storage(internal_format, width, height, samples);
        self.width = width;
        self.height = height;
        self.samples = samples;
        Ok(())
    }

    pub fn delete<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) {
        if let Some(handle) = self.handle.take() {
            ctx.device_mut().delete_renderbuffer(handle);
        }
    }
}
