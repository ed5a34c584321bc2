//! Pixel source adapter.
//!
//! Turns a Bevy [`Image`](bevy::image::Image), or a sub-rectangle of one for
//! atlas-packed sprites, into a [`PixelBuffer`] the mesh pipeline can walk.

mod buffer;
mod source;
mod validation;

pub use buffer::{PixelBuffer, Rgba8};
pub use source::{pixel_buffer_from_image, readable_image};
pub use validation::{PixelSourceError, is_bgra8_format, is_rgba8_format, validate_flat_2d};
