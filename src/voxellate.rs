//! The full sprite-to-voxel pipeline.

use bevy::image::Image;
use bevy::math::URect;
use bevy::mesh::Mesh;
use bevy::prelude::*;

use crate::config::VoxelConfig;
use crate::mesh::{VoxelMesh, build_voxel_mesh};
use crate::palette::{PaletteTexture, generate_palette};
use crate::pixels::{PixelBuffer, PixelSourceError, pixel_buffer_from_image};

/// Result of voxellating a sprite.
#[derive(Clone, Debug)]
pub struct Voxellation {
    pub mesh: VoxelMesh,
    /// Present when [`VoxelConfig::generate_palette`] is set. May be empty
    /// for a fully transparent sprite.
    pub palette: Option<PaletteTexture>,
}

impl Voxellation {
    /// The mesh as a Bevy [`Mesh`].
    pub fn bevy_mesh(&self) -> Mesh {
        self.mesh.to_mesh()
    }

    /// The palette as a Bevy [`Image`], if there is a non-empty palette.
    pub fn palette_image(&self) -> Option<Image> {
        self.palette.as_ref().and_then(PaletteTexture::to_image)
    }
}

/// Voxellates a pixel buffer.
///
/// Builds the cuboid mesh (with vertex colors when
/// [`VoxelConfig::apply_color_per_vertex`] is set), then the palette texture
/// and palette UVs when [`VoxelConfig::generate_palette`] is set. The result
/// depends only on `pixels` and `config`.
pub fn voxellate(pixels: &PixelBuffer, config: &VoxelConfig) -> Voxellation {
    let map_size = config
        .extrusion_map
        .as_ref()
        .map(|map| (map.width(), map.height()));
    if let Some((map_width, map_height)) = map_size
        .filter(|size| *size != (pixels.width(), pixels.height()))
    {
        warn!(
            "Extrusion map is {}x{} but the sprite is {}x{}; sampling clamps to the map's edge",
            map_width,
            map_height,
            pixels.width(),
            pixels.height()
        );
    }

    let mut mesh = build_voxel_mesh(pixels, config);
    let palette = config
        .generate_palette
        .then(|| generate_palette(&mut mesh, pixels));

    Voxellation { mesh, palette }
}

/// Reads `image` (or the `rect` part of it) and voxellates it.
pub fn voxellate_image(
    image: &Image,
    rect: Option<URect>,
    config: &VoxelConfig,
) -> Result<Voxellation, PixelSourceError> {
    let pixels = pixel_buffer_from_image(image, rect)?;
    Ok(voxellate(&pixels, config))
}
