//! Builder for collecting a sprite's distinct colors.

use std::collections::HashMap;

use super::texture::PaletteTexture;
use crate::pixels::{PixelBuffer, Rgba8};

/// Collects distinct non-transparent colors in first-seen order.
///
/// Each new color gets the next dense index, starting at 0. Transparent
/// colors are never added.
///
/// # Example
///
/// ```
/// use bevy_voxellator::palette::PaletteBuilder;
/// use bevy_voxellator::pixels::Rgba8;
///
/// let red = Rgba8::rgb(255, 0, 0);
/// let green = Rgba8::rgb(0, 255, 0);
///
/// let palette = PaletteBuilder::new()
///     .with_color(red)
///     .with_color(green)
///     .with_color(red)
///     .with_color(Rgba8::TRANSPARENT)
///     .build();
///
/// assert_eq!(palette.colors(), &[red, green]);
/// assert_eq!(palette.index_of(green), Some(1));
/// ```
#[derive(Default)]
pub struct PaletteBuilder {
    colors: Vec<Rgba8>,
    lookup: HashMap<Rgba8, u32>,
}

impl PaletteBuilder {
    /// Create a new empty palette builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every opaque color of `pixels` and build the palette.
    pub fn from_pixels(pixels: &PixelBuffer) -> PaletteTexture {
        Self::new().with_pixels(pixels).build()
    }

    /// Add a color to the palette.
    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.push_color(color);
        self
    }

    /// Add every opaque pixel's color, in buffer order.
    pub fn with_pixels(mut self, pixels: &PixelBuffer) -> Self {
        for (_, _, color) in pixels.opaque_pixels() {
            self.push_color(color);
        }
        self
    }

    /// Add a color (mutable version for loops).
    ///
    /// Returns the color's palette index, or `None` for transparent colors.
    pub fn push_color(&mut self, color: Rgba8) -> Option<u32> {
        if color.is_transparent() {
            return None;
        }

        let next = self.colors.len() as u32;
        let index = *self.lookup.entry(color).or_insert(next);
        if index == next {
            self.colors.push(color);
        }
        Some(index)
    }

    /// Get the current distinct color count.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Build the palette.
    pub fn build(self) -> PaletteTexture {
        PaletteTexture::from_parts(self.colors, self.lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = Rgba8::rgb(255, 0, 0);
    const GREEN: Rgba8 = Rgba8::rgb(0, 255, 0);
    const BLUE: Rgba8 = Rgba8::rgb(0, 0, 255);

    #[test]
    fn test_first_seen_order() {
        let pixels = PixelBuffer::new(5, 1, vec![BLUE, RED, BLUE, GREEN, RED]).unwrap();
        let palette = PaletteBuilder::from_pixels(&pixels);

        assert_eq!(palette.colors(), &[BLUE, RED, GREEN]);
        assert_eq!(palette.index_of(BLUE), Some(0));
        assert_eq!(palette.index_of(RED), Some(1));
        assert_eq!(palette.index_of(GREEN), Some(2));
    }

    #[test]
    fn test_transparent_is_ignored() {
        let mut builder = PaletteBuilder::new();
        assert_eq!(builder.push_color(Rgba8::TRANSPARENT), None);
        // Zero alpha is transparent whatever the color channels hold.
        assert_eq!(builder.push_color(Rgba8::new(255, 0, 0, 0)), None);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_alpha_distinguishes_colors() {
        let mut builder = PaletteBuilder::new();
        assert_eq!(builder.push_color(Rgba8::new(255, 0, 0, 255)), Some(0));
        assert_eq!(builder.push_color(Rgba8::new(255, 0, 0, 128)), Some(1));
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_duplicate_keeps_index() {
        let mut builder = PaletteBuilder::new();
        builder.push_color(RED);
        builder.push_color(GREEN);
        assert_eq!(builder.push_color(RED), Some(0));
        assert_eq!(builder.len(), 2);
    }
}
