use log::warn;

use super::{Renderbuffer, Texture};
use crate::error::{Error, Result};
use crate::gfx::device::{Attachment, Context, FramebufferTarget, GraphicsDevice, Handle};

/// A framebuffer object. Attach calls bind it first, creating it if needed.
#[derive(Debug, Default)]
pub struct Framebuffer {
    target: FramebufferTarget,
    handle: Option<Handle>,
}

impl Framebuffer {
    pub fn new(target: FramebufferTarget) -> Self {
        Self { target, handle: None }
    }

    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    pub fn target(&self) -> FramebufferTarget {
        self.target
    }

    pub fn set_target(&mut self, target: FramebufferTarget) {
        self.target = target;
    }

    pub fn bind<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Result<()> {
        let handle = match self.handle {
            Some(handle) => handle,
            None => {
                let handle = ctx.device_mut().create_framebuffer()?;
                self.handle = Some(handle);
                handle
            }
        };
        ctx.device_mut().bind_framebuffer(self.target, Some(handle));
        Ok(())
    }

    /// Restores the default framebuffer on this target.
    pub fn unbind<D: GraphicsDevice>(&self, ctx: &mut Context<D>) {
        ctx.device_mut().bind_framebuffer(self.target, None);
    }

    /// Attaches mip `level` of a 2D texture. A texture that was never
    /// allocated detaches the attachment point.
    pub fn attach_texture<D: GraphicsDevice>(
        &mut self,
        ctx: &mut Context<D>,
        attachment: Attachment,
        texture: &Texture,
        level: i32,
    ) -> Result<()> {
        if texture.handle().is_none() {
            warn!("attaching an unallocated texture to {:?}", attachment);
        }
        self.bind(ctx)?;
        ctx.device_mut().framebuffer_texture_2d(
            self.target,
            attachment,
            texture.target(),
            texture.handle(),
            level,
        );
        Ok(())
    }

    pub fn attach_renderbuffer<D: GraphicsDevice>(
        &mut self,
        ctx: &mut Context<D>,
        attachment: Attachment,
        renderbuffer: &Renderbuffer,
    ) -> Result<()> {
        if renderbuffer.handle().is_none() {
            warn!("attaching an unallocated renderbuffer to {:?}", attachment);
        }
        self.bind(ctx)?;
        ctx.device_mut()
            .framebuffer_renderbuffer(self.target, attachment, renderbuffer.handle());
        Ok(())
    }

    pub fn color_target<D: GraphicsDevice>(
        &mut self,
        ctx: &mut Context<D>,
        index: u32,
        texture: &Texture,
        level: i32,
    ) -> Result<()> {
        self.attach_texture(ctx, Attachment::Color(index), texture, level)
    }

    pub fn depth_target<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, renderbuffer: &Renderbuffer) -> Result<()> {
        self.attach_renderbuffer(ctx, Attachment::Depth, renderbuffer)
    }

    pub fn stencil_target<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, renderbuffer: &Renderbuffer) -> Result<()> {
        self.attach_renderbuffer(ctx, Attachment::Stencil, renderbuffer)
    }

    /// Binds the framebuffer and asks the device whether it can be drawn to.
    pub fn check_status<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Result<()> {
        self.bind(ctx)?;
        match ctx.device_mut().check_framebuffer_status(self.target) {
            glow::FRAMEBUFFER_COMPLETE => Ok(()),
            status => Err(Error::IncompleteFramebuffer(status)),
        }
    }

    pub fn delete<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) {
        if let Some(handle) = self.handle.take() {
            ctx.device_mut().delete_framebuffer(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::device::{HeadlessDevice, PixelFormat};

    #[test]
    fn test_empty_framebuffer_is_incomplete() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut fbo = Framebuffer::new(FramebufferTarget::Framebuffer);
        match fbo.check_status(&mut ctx) {
            Err(Error::IncompleteFramebuffer(status)) => {
                assert_eq!(status, glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT)
            }
            other => panic!("expected incomplete framebuffer, got {:?}", other),
        }
    }

    #[test]
    fn test_render_to_texture_setup() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut color = Texture::default();
        color
            .set_data_2d(&mut ctx, 0, PixelFormat::Rgba, 128, 128, PixelFormat::Rgba, None)
            .unwrap();
        let mut depth = Renderbuffer::new();
        depth.storage(&mut ctx, glow::DEPTH_COMPONENT24, 128, 128).unwrap();

        let mut fbo = Framebuffer::new(FramebufferTarget::Framebuffer);
        fbo.color_target(&mut ctx, 0, &color, 0).unwrap();
        fbo.depth_target(&mut ctx, &depth).unwrap();
        fbo.check_status(&mut ctx).unwrap();

        let handle = fbo.handle().unwrap();
        assert_eq!(
            ctx.device().framebuffer_attachment(handle, Attachment::Color(0)),
            color.handle()
        );
        assert_eq!(
            ctx.device().framebuffer_attachment(handle, Attachment::Depth),
            depth.handle()
        );

        fbo.unbind(&mut ctx);
        assert_eq!(ctx.device().bound_framebuffer(FramebufferTarget::Framebuffer), None);
    }
}
