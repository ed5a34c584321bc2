//! Voxellation settings.

use crate::pixels::PixelBuffer;

/// Fixed factor applied to [`VoxelConfig::scale`] to keep voxel sizes sensible.
///
/// A scale of `1.0` therefore yields voxels one tenth of a world unit wide.
pub const VOXEL_SCALE_FACTOR: f32 = 0.1;

/// Settings for turning a sprite into a voxel mesh.
///
/// # Example
///
/// ```
/// use bevy_voxellator::config::VoxelConfig;
///
/// let config = VoxelConfig::new()
///     .with_scale(2.0)
///     .with_extrusion_factor(0.5)
///     .with_vertex_colors(true);
///
/// assert_eq!(config.effective_scale(), 0.2);
/// ```
#[derive(Clone, Debug)]
pub struct VoxelConfig<'a> {
    /// World size of one voxel, before [`VOXEL_SCALE_FACTOR`] is applied.
    ///
    /// Default: 1.0
    pub scale: f32,

    /// Multiplier for the extrusion depth along Z.
    ///
    /// Each cuboid spans `[-depth, +depth]`, so the total thickness is twice
    /// `extrusion_factor * effective_scale`.
    ///
    /// Default: 1.0
    pub extrusion_factor: f32,

    /// Optional greyscale map driving per-pixel depth. Darker pixels extrude
    /// further.
    ///
    /// It is sampled with the same coordinates as the sprite; a map of
    /// different size is clamped to its edge.
    pub extrusion_map: Option<PixelBuffer<'a>>,

    /// Duplicate each pixel's color onto every vertex of its cuboid.
    ///
    /// Default: false
    pub apply_color_per_vertex: bool,

    /// Build a palette texture and palette UVs for the mesh.
    ///
    /// Default: true
    pub generate_palette: bool,
}

impl Default for VoxelConfig<'_> {
    fn default() -> Self {
        Self {
            scale: 1.0,
            extrusion_factor: 1.0,
            extrusion_map: None,
            apply_color_per_vertex: false,
            generate_palette: true,
        }
    }
}

impl<'a> VoxelConfig<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_extrusion_factor(mut self, factor: f32) -> Self {
        self.extrusion_factor = factor;
        self
    }

    pub fn with_extrusion_map(mut self, map: PixelBuffer<'a>) -> Self {
        self.extrusion_map = Some(map);
        self
    }

    pub fn with_vertex_colors(mut self, enable: bool) -> Self {
        self.apply_color_per_vertex = enable;
        self
    }

    pub fn with_palette(mut self, enable: bool) -> Self {
        self.generate_palette = enable;
        self
    }

    /// Size of one voxel in world units.
    #[inline]
    pub fn effective_scale(&self) -> f32 {
        self.scale * VOXEL_SCALE_FACTOR
    }
}
