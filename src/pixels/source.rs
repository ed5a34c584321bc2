//! Reading pixel buffers out of Bevy images.

use std::borrow::Cow;

use bevy::asset::RenderAssetUsages;
use bevy::image::Image;
use bevy::math::URect;
use bevy::prelude::*;

use super::buffer::{PixelBuffer, Rgba8};
use super::validation::{self, PixelSourceError};

/// Returns an image whose pixels can be read on the CPU.
///
/// Images without [`RenderAssetUsages::MAIN_WORLD`] have their bytes dropped
/// once they are uploaded, so a duplicate is made from the raw bytes while
/// they still exist. The duplicate keeps the exact texture descriptor,
/// format and sampler of the source image.
///
/// Fails with [`PixelSourceError::NoCpuData`] when the bytes are already gone.
pub fn readable_image(image: &Image) -> Result<Cow<'_, Image>, PixelSourceError> {
    let data = image.data.as_ref().ok_or(PixelSourceError::NoCpuData)?;

    if image.asset_usage.contains(RenderAssetUsages::MAIN_WORLD) {
        return Ok(Cow::Borrowed(image));
    }

    let descriptor = &image.texture_descriptor;
    let mut duplicate = Image::new(
        descriptor.size,
        descriptor.dimension,
        data.clone(),
        descriptor.format,
        image.asset_usage | RenderAssetUsages::MAIN_WORLD,
    );
    duplicate.texture_descriptor = descriptor.clone();
    duplicate.sampler = image.sampler.clone();
    duplicate.texture_view_descriptor = image.texture_view_descriptor.clone();

    debug!(
        "Duplicated non-readable {}x{} image for pixel access",
        descriptor.size.width, descriptor.size.height
    );

    Ok(Cow::Owned(duplicate))
}

/// Extracts an RGBA8 [`PixelBuffer`] from `image`.
///
/// `rect` selects a sub-rectangle in Bevy image coordinates (origin at the
/// top-left, as used by `Sprite::rect` and texture atlas layouts). `None`
/// reads the whole image.
///
/// Bevy stores rows top to bottom, so rows are flipped into the buffer's
/// bottom-to-top layout.
///
/// Formats other than RGBA8 are read best-effort with a warning: BGRA8 is
/// swizzled, everything else is decoded through [`Image::get_color_at`].
/// sRGB formats are quantized to sRGB bytes; other formats keep their raw
/// channel values, so an `R8Unorm` depth map reads the same as an RGBA8 one.
pub fn pixel_buffer_from_image(
    image: &Image,
    rect: Option<URect>,
) -> Result<PixelBuffer<'static>, PixelSourceError> {
    validation::validate_flat_2d(image)?;

    let width = image.width();
    let height = image.height();
    let rect = match rect {
        Some(rect) => {
            if rect.min.x > rect.max.x
                || rect.min.y > rect.max.y
                || rect.max.x > width
                || rect.max.y > height
            {
                return Err(PixelSourceError::RectOutOfBounds {
                    min: rect.min,
                    max: rect.max,
                    width,
                    height,
                });
            }
            rect
        }
        None => URect::new(0, 0, width, height),
    };

    let readable = readable_image(image)?;
    let format = readable.texture_descriptor.format;
    let rect_width = rect.width();
    let rect_height = rect.height();
    let mut pixels = Vec::with_capacity(rect_width as usize * rect_height as usize);

    let bgra = validation::is_bgra8_format(format);
    if validation::is_rgba8_format(format) || bgra {
        if bgra {
            warn!("Source image is {format:?}; swizzling to RGBA8. Prefer an RGBA8 texture.");
        }

        let data = readable
            .data
            .as_deref()
            .ok_or(PixelSourceError::NoCpuData)?;
        let texels: &[Rgba8] = bytemuck::try_cast_slice(data)
            .map_err(|_| PixelSourceError::UnalignedBytes { len: data.len() })?;

        for y in (rect.min.y..rect.max.y).rev() {
            let start = y as usize * width as usize + rect.min.x as usize;
            let row = texels
                .get(start..start + rect_width as usize)
                .ok_or(PixelSourceError::TruncatedTexels {
                    expected: width as usize * height as usize,
                    found: texels.len(),
                })?;

            if bgra {
                pixels.extend(row.iter().map(|texel| texel.swap_red_blue()));
            } else {
                pixels.extend_from_slice(row);
            }
        }
    } else {
        warn!("Source image is {format:?}, not RGBA8; reading texels best-effort.");
        let srgb = format.is_srgb();

        for y in (rect.min.y..rect.max.y).rev() {
            for x in rect.min.x..rect.max.x {
                let color = readable
                    .get_color_at(x, y)
                    .map_err(|err| PixelSourceError::TexelAccess {
                        x,
                        y,
                        reason: err.to_string(),
                    })?;
                // Non-sRGB formats hold raw values, which must not be gamma-encoded.
                pixels.push(if srgb {
                    Rgba8::from(color)
                } else {
                    Rgba8::from_unorm(color.to_linear())
                });
            }
        }
    }

    PixelBuffer::new(rect_width, rect_height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

    /// 2x2 image, rows top to bottom: [A, B], [C, D].
    fn quad_image(format: TextureFormat, usage: RenderAssetUsages) -> Image {
        let data = vec![
            10, 0, 0, 255, 20, 0, 0, 255, // top row
            30, 0, 0, 255, 40, 0, 0, 255, // bottom row
        ];
        Image::new(
            Extent3d {
                width: 2,
                height: 2,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            format,
            usage,
        )
    }

    fn red_channel(buffer: &PixelBuffer) -> Vec<u8> {
        buffer.pixels().iter().map(|p| p.r).collect()
    }

    #[test]
    fn test_full_image_is_flipped_bottom_to_top() {
        let image = quad_image(TextureFormat::Rgba8UnormSrgb, RenderAssetUsages::MAIN_WORLD);
        let buffer = pixel_buffer_from_image(&image, None).unwrap();

        assert_eq!((buffer.width(), buffer.height()), (2, 2));
        assert_eq!(red_channel(&buffer), vec![30, 40, 10, 20]);
    }

    #[test]
    fn test_sub_rect() {
        let image = quad_image(TextureFormat::Rgba8UnormSrgb, RenderAssetUsages::MAIN_WORLD);
        let buffer = pixel_buffer_from_image(&image, Some(URect::new(1, 0, 2, 2))).unwrap();

        assert_eq!((buffer.width(), buffer.height()), (1, 2));
        assert_eq!(red_channel(&buffer), vec![40, 20]);
    }

    #[test]
    fn test_rect_out_of_bounds() {
        let image = quad_image(TextureFormat::Rgba8UnormSrgb, RenderAssetUsages::MAIN_WORLD);
        let result = pixel_buffer_from_image(&image, Some(URect::new(0, 0, 3, 2)));

        assert!(matches!(
            result,
            Err(PixelSourceError::RectOutOfBounds { width: 2, height: 2, .. })
        ));
    }

    #[test]
    fn test_bgra_is_swizzled() {
        let image = quad_image(TextureFormat::Bgra8UnormSrgb, RenderAssetUsages::MAIN_WORLD);
        let buffer = pixel_buffer_from_image(&image, None).unwrap();

        assert_eq!(buffer.pixels()[0], Rgba8::new(0, 0, 30, 255));
    }

    #[test]
    fn test_r8_map_keeps_raw_values() {
        let image = Image::new(
            Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            vec![128],
            TextureFormat::R8Unorm,
            RenderAssetUsages::MAIN_WORLD,
        );
        let buffer = pixel_buffer_from_image(&image, None).unwrap();
        let texel = buffer.pixels()[0];

        assert_eq!(texel.r, 128);
        assert!(!texel.is_transparent());
        assert!((texel.grayscale() - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_truncated_texels() {
        let mut image = quad_image(TextureFormat::Rgba8UnormSrgb, RenderAssetUsages::MAIN_WORLD);
        image.data = Some(vec![10, 0, 0, 255]);

        assert_eq!(
            pixel_buffer_from_image(&image, None),
            Err(PixelSourceError::TruncatedTexels {
                expected: 4,
                found: 1
            })
        );
    }

    #[test]
    fn test_readable_image_borrows_when_readable() {
        let image = quad_image(TextureFormat::Rgba8UnormSrgb, RenderAssetUsages::default());
        assert!(matches!(readable_image(&image), Ok(Cow::Borrowed(_))));
    }

    #[test]
    fn test_readable_image_duplicates_render_only_image() {
        let image = quad_image(TextureFormat::Rgba8Unorm, RenderAssetUsages::RENDER_WORLD);
        let readable = readable_image(&image).unwrap();

        assert!(matches!(readable, Cow::Owned(_)));
        assert!(readable.asset_usage.contains(RenderAssetUsages::MAIN_WORLD));
        assert_eq!(readable.data, image.data);
        assert_eq!(readable.texture_descriptor.format, TextureFormat::Rgba8Unorm);
        assert_eq!(readable.texture_descriptor.size, image.texture_descriptor.size);
    }

    #[test]
    fn test_missing_data() {
        let mut image = quad_image(TextureFormat::Rgba8UnormSrgb, RenderAssetUsages::RENDER_WORLD);
        image.data = None;

        assert_eq!(
            pixel_buffer_from_image(&image, None),
            Err(PixelSourceError::NoCpuData)
        );
    }
}
