//! Source image checks and pixel extraction errors.

use bevy::image::Image;
use bevy::math::UVec2;
use bevy::render::render_resource::{TextureDimension, TextureFormat};
use thiserror::Error;

/// Errors that can occur while extracting pixels from a source image.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PixelSourceError {
    #[error("Pixel count ({found}) does not match a {width}x{height} buffer")]
    LengthMismatch { width: u32, height: u32, found: usize },

    #[error("Raw RGBA8 data length ({len}) is not a whole number of pixels")]
    UnalignedBytes { len: usize },

    #[error("Image data holds {found} texels, fewer than the {expected} its size requires")]
    TruncatedTexels { expected: usize, found: usize },

    #[error("Image has no CPU-side pixel data to read")]
    NoCpuData,

    #[error("Image must be a single-layer 2D texture, got {dimension:?} with {layers} layers")]
    NotFlat2d {
        dimension: TextureDimension,
        layers: u32,
    },

    #[error("Sub-rectangle {min}..{max} exceeds image bounds {width}x{height}")]
    RectOutOfBounds {
        min: UVec2,
        max: UVec2,
        width: u32,
        height: u32,
    },

    #[error("Failed to read texel ({x}, {y}): {reason}")]
    TexelAccess { x: u32, y: u32, reason: String },
}

/// Check if a format stores texels as RGBA8 bytes we can read directly.
pub fn is_rgba8_format(format: TextureFormat) -> bool {
    matches!(
        format,
        TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb
    )
}

/// Check if a format is RGBA8 with red and blue swapped.
pub fn is_bgra8_format(format: TextureFormat) -> bool {
    matches!(
        format,
        TextureFormat::Bgra8Unorm | TextureFormat::Bgra8UnormSrgb
    )
}

/// Validate that an image is a plain, single-layer 2D texture.
pub fn validate_flat_2d(image: &Image) -> Result<(), PixelSourceError> {
    let dimension = image.texture_descriptor.dimension;
    let layers = image.texture_descriptor.size.depth_or_array_layers;

    if dimension != TextureDimension::D2 || layers != 1 {
        return Err(PixelSourceError::NotFlat2d { dimension, layers });
    }

    Ok(())
}
