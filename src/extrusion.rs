//! Per-pixel extrusion depth.

use crate::config::VoxelConfig;

/// Extrusion depth for the pixel at `(w, h)`.
///
/// `scale` is the effective voxel size (see [`VoxelConfig::effective_scale`]).
/// Without an extrusion map every pixel gets `extrusion_factor * scale`.
/// With one, the map's greyscale value at the same coordinate is inverted so
/// darker pixels extrude further:
///
/// ```text
/// depth = (1 - grey(map[w, h])) * extrusion_factor * scale
/// ```
///
/// The map is point-sampled. Coordinates outside a smaller map clamp to its
/// edge.
pub fn extrusion(config: &VoxelConfig, scale: f32, w: u32, h: u32) -> f32 {
    let depth = config.extrusion_factor * scale;

    match &config.extrusion_map {
        Some(map) => (1.0 - map.get_clamped(w, h).grayscale()) * depth,
        None => depth,
    }
}
