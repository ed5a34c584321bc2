//! Cuboid mesh builder for voxellated sprites.

use bevy::mesh::Indices;
use bevy::prelude::*;

use super::colors;
use super::cuboid::{CUBOID_INDEX_COUNT, CUBOID_VERTEX_COUNT, Cuboid};
use super::VoxelMesh;
use crate::config::VoxelConfig;
use crate::extrusion::extrusion;
use crate::pixels::{PixelBuffer, Rgba8};

/// Vertex count at which indices switch from `u16` to `u32`.
///
/// Matches `i16::MAX`, the limit many engines place on 16-bit index buffers.
pub const WIDE_INDEX_THRESHOLD: usize = i16::MAX as usize;

/// Collects cuboids into a [`VoxelMesh`].
///
/// Each pushed cuboid appends 24 positions, 24 normals and 36 indices, with
/// indices offset by the number of vertices already written.
///
/// # Example
/// ```
/// use bevy_voxellator::mesh::{Cuboid, VoxelMeshBuilder};
/// use bevy_voxellator::pixels::Rgba8;
///
/// let mut builder = VoxelMeshBuilder::with_capacity(2, false);
/// builder.push_cuboid(&Cuboid::new(0.0, 0.0, 1.0, 1.0), Rgba8::rgb(255, 0, 0));
/// builder.push_cuboid(&Cuboid::new(1.0, 0.0, 1.0, 1.0), Rgba8::rgb(0, 255, 0));
///
/// let mesh = builder.build();
/// assert_eq!(mesh.vertex_count(), 48);
/// assert_eq!(mesh.triangle_count(), 24);
/// ```
#[derive(Default)]
pub struct VoxelMeshBuilder {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
    colors: Option<Vec<Rgba8>>,
}

impl VoxelMeshBuilder {
    /// Create a new empty builder that records no vertex colors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder sized for up to `cuboid_count` cuboids.
    ///
    /// When `with_colors` is set, the color passed to
    /// [`push_cuboid`](Self::push_cuboid) is stored on every vertex.
    pub fn with_capacity(cuboid_count: usize, with_colors: bool) -> Self {
        let vertex_count = cuboid_count * CUBOID_VERTEX_COUNT;
        Self {
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(cuboid_count * CUBOID_INDEX_COUNT),
            colors: with_colors.then(|| Vec::with_capacity(vertex_count)),
        }
    }

    /// Append one cuboid.
    pub fn push_cuboid(&mut self, cuboid: &Cuboid, color: Rgba8) {
        let base = self.positions.len() as u32;

        self.positions.extend_from_slice(&cuboid.positions());
        self.normals.extend_from_slice(&Cuboid::normals());
        self.indices.extend_from_slice(&Cuboid::indices(base));

        if let Some(colors) = self.colors.as_mut() {
            colors.extend_from_slice(&colors::cuboid_colors(color));
        }
    }

    /// Get the current vertex count.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the current cuboid count.
    pub fn cuboid_count(&self) -> usize {
        self.positions.len() / CUBOID_VERTEX_COUNT
    }

    /// Finish the mesh.
    ///
    /// Indices are stored as `u16` unless the vertex count reaches
    /// [`WIDE_INDEX_THRESHOLD`]. Spare capacity is released.
    pub fn build(mut self) -> VoxelMesh {
        self.positions.shrink_to_fit();
        self.normals.shrink_to_fit();
        if let Some(colors) = self.colors.as_mut() {
            colors.shrink_to_fit();
        }

        let indices = if self.positions.len() >= WIDE_INDEX_THRESHOLD {
            self.indices.shrink_to_fit();
            Indices::U32(self.indices)
        } else {
            Indices::U16(self.indices.into_iter().map(|i| i as u16).collect())
        };

        VoxelMesh {
            positions: self.positions,
            normals: self.normals,
            indices,
            colors: self.colors,
            uvs: None,
        }
    }
}

/// Builds the cuboid mesh for every non-transparent pixel of `pixels`.
///
/// The sprite is centered on the origin in X and Y. Pixel `(w, h)` becomes a
/// cuboid of side [`VoxelConfig::effective_scale`] whose bottom-left corner
/// sits at `(start_x + w * s, start_y + h * s)`, extruded on Z by
/// [`extrusion`]. Fully transparent pixels produce nothing.
///
/// Vertices, normals, indices and (optionally) colors are emitted in one pass
/// over the same pixel enumeration, so every array stays aligned.
pub fn build_voxel_mesh(pixels: &PixelBuffer, config: &VoxelConfig) -> VoxelMesh {
    let scale = config.effective_scale();
    let start_x = -(pixels.width() as f32 * scale / 2.0);
    let start_y = -(pixels.height() as f32 * scale / 2.0);

    // Upper bound: transparent pixels are only known once the scan is done.
    let mut builder = VoxelMeshBuilder::with_capacity(pixels.len(), config.apply_color_per_vertex);

    for (w, h, color) in pixels.opaque_pixels() {
        let x = start_x + w as f32 * scale;
        let y = start_y + h as f32 * scale;
        let depth = extrusion(config, scale, w, h);

        builder.push_cuboid(&Cuboid::new(x, y, scale, depth), color);
    }

    debug!(
        "Built {} cuboids ({} vertices) from {}x{} pixels",
        builder.cuboid_count(),
        builder.vertex_count(),
        pixels.width(),
        pixels.height()
    );

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = Rgba8::rgb(255, 0, 0);

    #[test]
    fn test_builder_empty() {
        let mesh = VoxelMeshBuilder::new().build();
        assert!(mesh.is_empty());
        assert_eq!(mesh.indices.len(), 0);
        assert!(mesh.colors.is_none());
    }

    #[test]
    fn test_builder_records_colors_when_enabled() {
        let mut builder = VoxelMeshBuilder::with_capacity(1, true);
        builder.push_cuboid(&Cuboid::new(0.0, 0.0, 1.0, 1.0), RED);
        let mesh = builder.build();

        assert_eq!(mesh.colors, Some(vec![RED; 24]));
    }

    #[test]
    fn test_narrow_indices_below_threshold() {
        let pixels = PixelBuffer::filled(4, 4, RED);
        let mesh = build_voxel_mesh(&pixels, &VoxelConfig::default());

        assert!(matches!(mesh.indices, Indices::U16(_)));
    }

    #[test]
    fn test_wide_indices_at_threshold() {
        // 1366 cuboids * 24 = 32784 vertices, just past i16::MAX.
        let pixels = PixelBuffer::filled(1366, 1, RED);
        let mesh = build_voxel_mesh(&pixels, &VoxelConfig::default());

        assert!(mesh.vertex_count() >= WIDE_INDEX_THRESHOLD);
        assert!(matches!(mesh.indices, Indices::U32(_)));
        assert_eq!(mesh.indices.iter().max(), Some(mesh.vertex_count() - 1));
    }

    #[test]
    fn test_unit_cube() {
        let pixels = PixelBuffer::filled(1, 1, RED);
        let config = VoxelConfig::new().with_scale(10.0);
        let mesh = build_voxel_mesh(&pixels, &config);

        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);

        for [x, y, z] in &mesh.positions {
            assert!(*x == -0.5 || *x == 0.5, "x = {x}");
            assert!(*y == -0.5 || *y == 0.5, "y = {y}");
            assert!(*z == -1.0 || *z == 1.0, "z = {z}");
        }
    }

    #[test]
    fn test_grid_is_centered() {
        let pixels = PixelBuffer::filled(4, 2, RED);
        let config = VoxelConfig::new().with_scale(10.0);
        let mesh = build_voxel_mesh(&pixels, &config);

        let min_x = mesh.positions.iter().map(|p| p[0]).fold(f32::MAX, f32::min);
        let max_x = mesh.positions.iter().map(|p| p[0]).fold(f32::MIN, f32::max);
        let min_y = mesh.positions.iter().map(|p| p[1]).fold(f32::MAX, f32::min);
        let max_y = mesh.positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max);

        assert_eq!((min_x, max_x), (-2.0, 2.0));
        assert_eq!((min_y, max_y), (-1.0, 1.0));
    }

    #[test]
    fn test_transparent_pixels_are_skipped() {
        let pixels = PixelBuffer::from_fn(3, 3, |w, h| {
            if w == h { RED } else { Rgba8::TRANSPARENT }
        });
        let mesh = build_voxel_mesh(&pixels, &VoxelConfig::default());

        assert_eq!(mesh.vertex_count(), 3 * 24);
        assert_eq!(mesh.indices.len(), 3 * 36);
        assert!(mesh.indices.iter().all(|i| i < mesh.vertex_count()));
    }

    #[test]
    fn test_cuboids_follow_pixel_order() {
        // Opaque pixels at (1, 0) and (0, 1): the first block must be the
        // bottom row's pixel.
        let pixels = PixelBuffer::from_fn(2, 2, |w, h| {
            if w + h == 1 { RED } else { Rgba8::TRANSPARENT }
        });
        let config = VoxelConfig::new().with_scale(10.0);
        let mesh = build_voxel_mesh(&pixels, &config);

        // Bottom face, corner 0 of each cuboid.
        assert_eq!(mesh.positions[0], [0.0, -1.0, 1.0]);
        assert_eq!(mesh.positions[24], [-1.0, 0.0, 1.0]);
    }
}
