//! Image files to 2D textures.

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use log::{debug, error};

use crate::error::Result;
use crate::gfx::device::{Context, GraphicsDevice, PixelFormat, TextureTarget};
use crate::gfx::resources::Texture;

/// Decodes `path` and uploads it with [`texture_from_image`].
pub fn load_texture<D: GraphicsDevice>(ctx: &mut Context<D>, path: impl AsRef<Path>) -> Result<Texture> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| {
        error!("could not load texture {}: {}", path.display(), e);
        e
    })?;
    debug!("loaded texture {} ({}x{})", path.display(), image.width(), image.height());
    texture_from_image(ctx, &image)
}

/// Uploads `image` as an RGB or RGBA texture, depending on whether it has an
/// alpha channel. Rows are flipped so the first row in memory is the bottom
/// of the image. Wrapping repeats and filtering is linear.
pub fn texture_from_image<D: GraphicsDevice>(ctx: &mut Context<D>, image: &DynamicImage) -> Result<Texture> {
    let (width, height) = image.dimensions();
    let flipped = image.flipv();
    let (format, pixels) = if image.color().has_alpha() {
        (PixelFormat::Rgba, flipped.to_rgba8().into_raw())
    } else {
        (PixelFormat::Rgb, flipped.to_rgb8().into_raw())
    };

    let mut texture = Texture::new(TextureTarget::Texture2D);
    texture.bind(ctx)?;
    ctx.device_mut().pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
    texture.set_wrap(ctx, glow::REPEAT)?;
    texture.set_filter(ctx, glow::LINEAR, glow::LINEAR)?;
    texture.set_data_2d(ctx, 0, format, width, height, format, Some(&pixels))?;
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::gfx::device::HeadlessDevice;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_rgb_rows_flipped() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut img = RgbImage::new(1, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));

        let texture = texture_from_image(&mut ctx, &DynamicImage::ImageRgb8(img)).unwrap();
        let state = ctx.device().texture(texture.handle().unwrap()).unwrap();
        assert_eq!(state.format, Some(PixelFormat::Rgb));
        assert_eq!(state.pixels, vec![0, 0, 255, 255, 0, 0]);
        assert_eq!(state.parameters.get(&glow::TEXTURE_WRAP_S), Some(&(glow::REPEAT as i32)));
        assert_eq!(state.parameters.get(&glow::TEXTURE_MIN_FILTER), Some(&(glow::LINEAR as i32)));
        assert_eq!(ctx.device().pixel_store(glow::UNPACK_ALIGNMENT), Some(1));
        assert_eq!((texture.width(), texture.height()), (1, 2));
    }

    #[test]
    fn test_alpha_selects_rgba() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
        let texture = texture_from_image(&mut ctx, &DynamicImage::ImageRgba8(img)).unwrap();
        let state = ctx.device().texture(texture.handle().unwrap()).unwrap();
        assert_eq!(state.format, Some(PixelFormat::Rgba));
        assert_eq!(state.pixels.len(), 16);
    }

    #[test]
    fn test_missing_file() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let result = load_texture(&mut ctx, "does/not/exist.png");
        assert!(matches!(result, Err(Error::Image(_))));
        assert_eq!(ctx.device().live_object_count(), 0);
    }
}
