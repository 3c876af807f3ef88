use log::trace;

use crate::error::Result;
use crate::gfx::device::{Context, GraphicsDevice, Handle, PixelFormat, TextureTarget};

/// A device texture object. The handle is created on first bind or upload.
///
/// Binding goes through the [`Context`] cache, so binding an already bound
/// texture on the active unit issues no device call.
#[derive(Debug, Default)]
pub struct Texture {
    target: TextureTarget,
    handle: Option<Handle>,
    width: u32,
    height: u32,
    depth: u32,
}

impl Texture {
    pub fn new(target: TextureTarget) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    pub fn target(&self) -> TextureTarget {
        self.target
    }

    pub fn set_target(&mut self, target: TextureTarget) {
        self.target = target;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn ensure_handle<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Result<Handle> {
        if let Some(handle) = self.handle {
            return Ok(handle);
        }
        let handle = ctx.device_mut().create_texture()?;
        trace!("created {:?} texture {}", self.target, handle);
        self.handle = Some(handle);
        Ok(handle)
    }

    /// Binds on the currently active texture unit.
    pub fn bind<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Result<()> {
        let handle = self.ensure_handle(ctx)?;
        ctx.bind_texture(self.target, Some(handle));
        Ok(())
    }

    pub fn bind_to_unit<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, unit: u32) -> Result<()> {
        ctx.active_texture(unit);
        self.bind(ctx)
    }

    pub fn unbind<D: GraphicsDevice>(&self, ctx: &mut Context<D>) {
        ctx.bind_texture(self.target, None);
    }

    /// Allocates level `level` and optionally fills it with `pixels`.
    ///
    /// # Panics
    ///
    /// Panics if `pixels` holds fewer bytes than `width * height` pixels of
    /// `format` need.
    #[allow(clippy::too_many_arguments)]
    pub fn set_data_2d<D: GraphicsDevice>(
        &mut self,
        ctx: &mut Context<D>,
        level: i32,
        internal_format: PixelFormat,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Option<&[u8]>,
    ) -> Result<()> {
        if let Some(pixels) = pixels {
            let needed = width as usize * height as usize * format.bytes_per_pixel();
            assert!(
                pixels.len() >= needed,
                "{}x{} {:?} texture needs {} bytes, got {}",
                width,
                height,
                format,
                needed,
                pixels.len()
            );
        }
        self.bind(ctx)?;
        ctx.device_mut()
            .tex_image_2d(self.target, level, internal_format, width, height, format, pixels);
        self.width = width;
        self.height = height;
        self.depth = 0;
        Ok(())
    }

    pub fn set_parameter<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, parameter: u32, value: i32) -> Result<()> {
        self.bind(ctx)?;
        ctx.device_mut().tex_parameter_i32(self.target, parameter, value);
        Ok(())
    }

    /// Sets S and T wrapping to one of the GL wrap modes.
    pub fn set_wrap<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, mode: u32) -> Result<()> {
        self.set_parameter(ctx, glow::TEXTURE_WRAP_S, mode as i32)?;
        self.set_parameter(ctx, glow::TEXTURE_WRAP_T, mode as i32)
    }

    pub fn set_filter<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, min: u32, mag: u32) -> Result<()> {
        self.set_parameter(ctx, glow::TEXTURE_MIN_FILTER, min as i32)?;
        self.set_parameter(ctx, glow::TEXTURE_MAG_FILTER, mag as i32)
    }

    pub fn generate_mipmap<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Result<()> {
        self.bind(ctx)?;
        ctx.device_mut().generate_mipmap(self.target);
        Ok(())
    }

    /// Frees the device object. Deleting twice is a no-op.
    pub fn delete<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) {
        if let Some(handle) = self.handle.take() {
            ctx.device_mut().delete_texture(handle);
            ctx.forget_texture(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::device::HeadlessDevice;

    #[test]
    fn test_upload_records_size_and_pixels() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut texture = Texture::new(TextureTarget::Texture2D);
        let pixels = [255u8; 2 * 2 * 4];
        texture
            .set_data_2d(&mut ctx, 0, PixelFormat::Rgba, 2, 2, PixelFormat::Rgba, Some(&pixels))
            .unwrap();

        assert_eq!((texture.width(), texture.height(), texture.depth()), (2, 2, 0));
        let state = ctx.device().texture(texture.handle().unwrap()).unwrap();
        assert_eq!(state.pixels.len(), 16);
        assert_eq!(state.format, Some(PixelFormat::Rgba));
    }

    #[test]
    fn test_repeated_binds_hit_the_cache() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut texture = Texture::default();
        texture.set_wrap(&mut ctx, glow::REPEAT).unwrap();
        texture.set_filter(&mut ctx, glow::LINEAR, glow::LINEAR).unwrap();
        assert_eq!(ctx.device().call_count("bind_texture"), 1);

        let state = ctx.device().texture(texture.handle().unwrap()).unwrap();
        assert_eq!(state.parameters.get(&glow::TEXTURE_WRAP_T), Some(&(glow::REPEAT as i32)));
    }

    #[test]
    fn test_delete_clears_cached_binding() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut texture = Texture::default();
        texture.bind_to_unit(&mut ctx, 2).unwrap();
        texture.delete(&mut ctx);
        texture.delete(&mut ctx);
        assert_eq!(ctx.bindings().texture(2, TextureTarget::Texture2D), None);
        assert_eq!(ctx.device().call_count("delete_texture"), 1);
    }

    #[test]
    #[should_panic(expected = "needs 12 bytes")]
    fn test_short_pixel_data_rejected() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut texture = Texture::default();
        let _ = texture.set_data_2d(&mut ctx, 0, PixelFormat::Rgb, 2, 2, PixelFormat::Rgb, Some(&[0; 8]));
    }
}
