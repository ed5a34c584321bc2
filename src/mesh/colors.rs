//! Per-vertex colors.

use bevy::prelude::*;

use super::VoxelMesh;
use super::cuboid::CUBOID_VERTEX_COUNT;
use crate::pixels::{PixelBuffer, Rgba8};

/// One copy of `color` for each vertex of a cuboid.
#[inline]
pub fn cuboid_colors(color: Rgba8) -> [Rgba8; CUBOID_VERTEX_COUNT] {
    [color; CUBOID_VERTEX_COUNT]
}

/// Vertex colors for every non-transparent pixel, in mesh order.
pub fn vertex_colors(pixels: &PixelBuffer) -> Vec<Rgba8> {
    let mut colors = Vec::with_capacity(pixels.len() * CUBOID_VERTEX_COUNT);
    for (_, _, color) in pixels.opaque_pixels() {
        colors.extend_from_slice(&cuboid_colors(color));
    }
    colors
}

/// Assigns vertex colors to a mesh previously built from `pixels`.
///
/// Does nothing and returns `false` if the colors would not line up with the
/// mesh's vertices, which means the mesh was built from another buffer.
pub fn assign_vertex_colors(mesh: &mut VoxelMesh, pixels: &PixelBuffer) -> bool {
    let expected = pixels.opaque_count() * CUBOID_VERTEX_COUNT;
    if expected != mesh.vertex_count() {
        warn!(
            "Skipping vertex colors: {} opaque pixels do not match {} mesh vertices",
            pixels.opaque_count(),
            mesh.vertex_count()
        );
        return false;
    }

    mesh.colors = Some(vertex_colors(pixels));
    true
}
