//! RGBA8 pixel storage shared by every pipeline stage.

use std::borrow::Cow;

use bevy::color::{Color, LinearRgba, Srgba};
use bytemuck::{Pod, Zeroable};

use super::validation::PixelSourceError;

/// A single 8-bit-per-channel RGBA color.
///
/// Alpha `0` marks a fully transparent pixel, which never produces geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from red, green and blue.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Perceptual greyscale value in `[0, 1]`.
    ///
    /// Uses the Rec. 601 luma weights on the stored (gamma-encoded) channels.
    pub fn grayscale(&self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    /// Swaps the red and blue channels (BGRA <-> RGBA).
    #[inline]
    pub const fn swap_red_blue(self) -> Self {
        Self::new(self.b, self.g, self.r, self.a)
    }

    /// Quantizes raw channel values to bytes with no transfer function.
    ///
    /// For data textures such as depth maps, where `0.5` should stay `128`.
    pub fn from_unorm(color: LinearRgba) -> Self {
        Self::new(
            quantize(color.red),
            quantize(color.green),
            quantize(color.blue),
            quantize(color.alpha),
        )
    }

    /// Converts to the linear float layout Bevy expects for `Mesh::ATTRIBUTE_COLOR`.
    pub fn to_linear_f32(&self) -> [f32; 4] {
        let linear = LinearRgba::from(Srgba::rgba_u8(self.r, self.g, self.b, self.a));
        [linear.red, linear.green, linear.blue, linear.alpha]
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(color: Rgba8) -> Self {
        color.to_array()
    }
}

impl From<Color> for Rgba8 {
    /// Quantizes any Bevy color to sRGB bytes.
    fn from(color: Color) -> Self {
        let srgba = color.to_srgba();
        Self::new(
            quantize(srgba.red),
            quantize(srgba.green),
            quantize(srgba.blue),
            quantize(srgba.alpha),
        )
    }
}

fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A `width` x `height` grid of [`Rgba8`] pixels.
///
/// # Layout
///
/// Pixels are row-major and rows run **bottom to top**: the pixel at column
/// `w` of row `h` lives at index `h * width + w`, and row `0` is the bottom
/// row of the picture. This keeps `+Y` pointing up in the generated mesh.
///
/// The buffer either borrows caller memory or owns its pixels, so a caller
/// that already holds bottom-to-top RGBA data pays no copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer<'a> {
    width: u32,
    height: u32,
    pixels: Cow<'a, [Rgba8]>,
}

impl<'a> PixelBuffer<'a> {
    /// Wraps `pixels` as a `width` x `height` buffer.
    ///
    /// Fails if the pixel count is not exactly `width * height`.
    pub fn new(
        width: u32,
        height: u32,
        pixels: impl Into<Cow<'a, [Rgba8]>>,
    ) -> Result<Self, PixelSourceError> {
        let pixels = pixels.into();
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(PixelSourceError::LengthMismatch {
                width,
                height,
                found: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Borrows tightly packed RGBA8 bytes without copying them.
    pub fn from_raw(width: u32, height: u32, bytes: &'a [u8]) -> Result<Self, PixelSourceError> {
        let pixels: &[Rgba8] = bytemuck::try_cast_slice(bytes)
            .map_err(|_| PixelSourceError::UnalignedBytes { len: bytes.len() })?;
        Self::new(width, height, pixels)
    }

    /// A buffer filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> PixelBuffer<'static> {
        PixelBuffer {
            width,
            height,
            pixels: Cow::Owned(vec![color; width as usize * height as usize]),
        }
    }

    /// Builds a buffer by evaluating `f(w, h)` for every cell.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> PixelBuffer<'static>
    where
        F: FnMut(u32, u32) -> Rgba8,
    {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for h in 0..height {
            for w in 0..width {
                pixels.push(f(w, h));
            }
        }
        PixelBuffer {
            width,
            height,
            pixels: Cow::Owned(pixels),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total pixel count, transparent pixels included.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Returns `true` if the pixels are borrowed rather than owned.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.pixels, Cow::Borrowed(_))
    }

    #[inline]
    pub fn get(&self, w: u32, h: u32) -> Option<Rgba8> {
        if w >= self.width || h >= self.height {
            return None;
        }
        self.pixels.get(self.index(w, h)).copied()
    }

    /// Like [`get`](Self::get) but clamps coordinates to the buffer's edge.
    ///
    /// An empty buffer yields [`Rgba8::TRANSPARENT`].
    pub fn get_clamped(&self, w: u32, h: u32) -> Rgba8 {
        if self.is_empty() {
            return Rgba8::TRANSPARENT;
        }
        let w = w.min(self.width - 1);
        let h = h.min(self.height - 1);
        self.pixels[self.index(w, h)]
    }

    /// Number of pixels with non-zero alpha.
    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|p| !p.is_transparent()).count()
    }

    /// Iterates `(w, h, color)` for every non-transparent pixel in row-major,
    /// bottom-to-top order.
    ///
    /// Every mesh pass walks this same enumeration, so per-vertex arrays stay
    /// aligned with each other.
    pub fn opaque_pixels(&self) -> impl Iterator<Item = (u32, u32, Rgba8)> + '_ {
        let width = self.width.max(1);
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, color)| !color.is_transparent())
            .map(move |(i, color)| (i as u32 % width, i as u32 / width, *color))
    }

    /// Detaches the buffer from any borrowed memory.
    pub fn into_owned(self) -> PixelBuffer<'static> {
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels: Cow::Owned(self.pixels.into_owned()),
        }
    }

    #[inline]
    fn index(&self, w: u32, h: u32) -> usize {
        h as usize * self.width as usize + w as usize
    }
}
