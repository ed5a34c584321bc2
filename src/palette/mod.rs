//! Palette texture mapping for voxel meshes.
//!
//! Deduplicates a sprite's colors into a compact 1xK [`PaletteTexture`] and
//! points each cuboid's UVs at its color's texel row.

mod builder;
mod texture;

pub use builder::PaletteBuilder;
pub use texture::{PaletteTexture, apply_palette_uvs};

use crate::mesh::VoxelMesh;
use crate::pixels::PixelBuffer;

/// Builds the palette for `pixels` and writes matching UVs onto `mesh`.
///
/// An empty palette (no opaque pixels) leaves the mesh untouched.
pub fn generate_palette(mesh: &mut VoxelMesh, pixels: &PixelBuffer) -> PaletteTexture {
    let palette = PaletteBuilder::from_pixels(pixels);
    apply_palette_uvs(mesh, pixels, &palette);
    palette
}
