//! Palette texture and palette UV mapping.

use std::collections::HashMap;

use bevy::asset::RenderAssetUsages;
use bevy::image::{Image, ImageSampler};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::mesh::{CUBOID_VERTEX_COUNT, VoxelMesh};
use crate::pixels::{PixelBuffer, Rgba8};

/// The distinct opaque colors of a sprite, laid out as a 1-wide, K-tall
/// texture.
///
/// Entry `i` occupies texel row `i`. A mesh vertex colored with entry `i`
/// gets the UV `(0, i / K + 1 / (2K))`, the vertical center of that row.
#[derive(Clone, Debug, Default)]
pub struct PaletteTexture {
    colors: Vec<Rgba8>,
    lookup: HashMap<Rgba8, u32>,
}

impl PaletteTexture {
    pub(super) fn from_parts(colors: Vec<Rgba8>, lookup: HashMap<Rgba8, u32>) -> Self {
        Self { colors, lookup }
    }

    /// Number of distinct colors (K).
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Palette colors in index order.
    pub fn colors(&self) -> &[Rgba8] {
        &self.colors
    }

    pub fn index_of(&self, color: Rgba8) -> Option<u32> {
        self.lookup.get(&color).copied()
    }

    /// UV sampling the center of palette row `index`.
    ///
    /// Returns `None` for an empty palette or an out-of-range index.
    pub fn uv_for(&self, index: u32) -> Option<[f32; 2]> {
        let count = self.colors.len();
        if index as usize >= count {
            return None;
        }

        let v = index as f32 / count as f32;
        let offset = 1.0 / (2.0 * count as f32);
        Some([0.0, v + offset])
    }

    /// UV for a color, if it is in the palette.
    pub fn uv_for_color(&self, color: Rgba8) -> Option<[f32; 2]> {
        self.index_of(color).and_then(|index| self.uv_for(index))
    }

    /// Build a 1xK sRGB image with nearest-neighbor sampling.
    ///
    /// Row `i` from the top holds entry `i`, which matches Bevy's
    /// top-origin V axis. Returns `None` for an empty palette, since a
    /// zero-sized texture cannot be uploaded.
    pub fn to_image(&self) -> Option<Image> {
        if self.colors.is_empty() {
            return None;
        }

        let data: Vec<u8> = bytemuck::cast_slice(&self.colors).to_vec();
        let mut image = Image::new(
            Extent3d {
                width: 1,
                height: self.colors.len() as u32,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        );
        image.sampler = ImageSampler::nearest();

        Some(image)
    }
}

/// Writes palette UVs onto a mesh previously built from `pixels`.
///
/// Every vertex of a pixel's cuboid gets the UV of that pixel's palette
/// entry. Does nothing and returns `false` when the palette is empty or the
/// UVs would not line up with the mesh's vertices.
pub fn apply_palette_uvs(
    mesh: &mut VoxelMesh,
    pixels: &PixelBuffer,
    palette: &PaletteTexture,
) -> bool {
    if palette.is_empty() {
        return false;
    }

    let expected = pixels.opaque_count() * CUBOID_VERTEX_COUNT;
    if expected != mesh.vertex_count() {
        warn!(
            "Skipping palette UVs: {} opaque pixels do not match {} mesh vertices",
            pixels.opaque_count(),
            mesh.vertex_count()
        );
        return false;
    }

    let mut uvs = Vec::with_capacity(expected);
    for (w, h, color) in pixels.opaque_pixels() {
        let Some(uv) = palette.uv_for_color(color) else {
            warn!("Skipping palette UVs: color {color:?} at ({w}, {h}) is not in the palette");
            return false;
        };
        uvs.extend_from_slice(&[uv; CUBOID_VERTEX_COUNT]);
    }

    mesh.uvs = Some(uvs);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VoxelConfig;
    use crate::mesh::build_voxel_mesh;
    use crate::palette::PaletteBuilder;

    const RED: Rgba8 = Rgba8::rgb(255, 0, 0);
    const GREEN: Rgba8 = Rgba8::rgb(0, 255, 0);
    const BLUE: Rgba8 = Rgba8::rgb(0, 0, 255);

    fn sprite() -> PixelBuffer<'static> {
        PixelBuffer::new(2, 2, vec![RED, GREEN, Rgba8::TRANSPARENT, RED]).unwrap()
    }

    #[test]
    fn test_uv_centers() {
        let palette = PaletteBuilder::new()
            .with_color(RED)
            .with_color(GREEN)
            .with_color(BLUE)
            .with_color(Rgba8::rgb(1, 2, 3))
            .build();

        assert_eq!(palette.uv_for(0), Some([0.0, 0.125]));
        assert_eq!(palette.uv_for(3), Some([0.0, 0.875]));
        assert_eq!(palette.uv_for(4), None);
    }

    #[test]
    fn test_empty_palette() {
        let palette = PaletteTexture::default();
        assert_eq!(palette.uv_for(0), None);
        assert!(palette.to_image().is_none());
    }

    #[test]
    fn test_image_layout() {
        let palette = PaletteBuilder::from_pixels(&sprite());
        let image = palette.to_image().unwrap();

        assert_eq!((image.width(), image.height()), (1, 2));
        assert_eq!(image.texture_descriptor.format, TextureFormat::Rgba8UnormSrgb);
        assert_eq!(
            image.data.as_deref(),
            Some(&[255, 0, 0, 255, 0, 255, 0, 255][..])
        );
    }

    #[test]
    fn test_uvs_follow_pixel_colors() {
        let pixels = sprite();
        let palette = PaletteBuilder::from_pixels(&pixels);
        let mut mesh = build_voxel_mesh(&pixels, &VoxelConfig::default());

        assert!(apply_palette_uvs(&mut mesh, &pixels, &palette));

        let uvs = mesh.uvs.as_ref().unwrap();
        assert_eq!(uvs.len(), mesh.vertex_count());
        // Pixels in order: RED, GREEN, RED.
        assert!(uvs[..24].iter().all(|uv| *uv == [0.0, 0.25]));
        assert!(uvs[24..48].iter().all(|uv| *uv == [0.0, 0.75]));
        assert!(uvs[48..].iter().all(|uv| *uv == [0.0, 0.25]));
    }

    #[test]
    fn test_empty_palette_writes_nothing() {
        let pixels = PixelBuffer::filled(2, 2, Rgba8::TRANSPARENT);
        let palette = PaletteBuilder::from_pixels(&pixels);
        let mut mesh = build_voxel_mesh(&pixels, &VoxelConfig::default());

        assert!(!apply_palette_uvs(&mut mesh, &pixels, &palette));
        assert!(mesh.uvs.is_none());
    }

    #[test]
    fn test_foreign_palette_is_rejected() {
        let pixels = sprite();
        let palette = PaletteBuilder::new().with_color(BLUE).build();
        let mut mesh = build_voxel_mesh(&pixels, &VoxelConfig::default());

        assert!(!apply_palette_uvs(&mut mesh, &pixels, &palette));
        assert!(mesh.uvs.is_none());
    }
}
