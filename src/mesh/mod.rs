//! Voxel mesh generation.
//!
//! Every non-transparent pixel becomes an independent 24-vertex [`Cuboid`].
//! The result is a [`VoxelMesh`]: plain, engine-agnostic arrays that convert
//! into a Bevy [`Mesh`] with:
//! - `ATTRIBUTE_POSITION`: cuboid corners
//! - `ATTRIBUTE_NORMAL`: flat, axis-aligned face normals
//! - `ATTRIBUTE_COLOR`: optional per-vertex pixel color (linear RGBA)
//! - `ATTRIBUTE_UV_0`: optional palette coordinates

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};

use crate::pixels::Rgba8;

mod builder;
mod colors;
mod cuboid;

pub use builder::{VoxelMeshBuilder, WIDE_INDEX_THRESHOLD, build_voxel_mesh};
pub use colors::{assign_vertex_colors, cuboid_colors, vertex_colors};
pub use cuboid::{CUBOID_INDEX_COUNT, CUBOID_VERTEX_COUNT, Cuboid, CuboidFace};

/// Suffix appended to a sprite's name to name its voxel mesh.
pub const VOXEL_NAME_POSTFIX: &str = "_voxelmesh";

/// Name for the voxel mesh generated from a sprite called `sprite_name`.
pub fn voxel_mesh_name(sprite_name: &str) -> String {
    format!("{sprite_name}{VOXEL_NAME_POSTFIX}")
}

/// Geometry produced from a sprite.
///
/// `positions`, `normals` and, when present, `colors` and `uvs` are
/// index-aligned and hold 24 entries per opaque pixel. `indices` holds 36
/// entries per opaque pixel, each within `0..positions.len()`.
#[derive(Clone, Debug)]
pub struct VoxelMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Indices,
    pub colors: Option<Vec<Rgba8>>,
    pub uvs: Option<Vec<[f32; 2]>>,
}

impl Default for VoxelMesh {
    fn default() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Indices::U16(Vec::new()),
            colors: None,
            uvs: None,
        }
    }
}

impl VoxelMesh {
    /// Returns `true` if no cuboid was emitted.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of cuboids (opaque pixels) in the mesh.
    pub fn cuboid_count(&self) -> usize {
        self.positions.len() / CUBOID_VERTEX_COUNT
    }

    /// Convert into a Bevy [`Mesh`] usable by the render world and still
    /// readable from the main world.
    pub fn to_mesh(&self) -> Mesh {
        self.clone().into()
    }
}

impl From<VoxelMesh> for Mesh {
    fn from(voxel_mesh: VoxelMesh) -> Self {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        );

        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, voxel_mesh.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, voxel_mesh.normals);

        if let Some(colors) = voxel_mesh.colors {
            let colors: Vec<[f32; 4]> = colors.iter().map(Rgba8::to_linear_f32).collect();
            mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
        }

        if let Some(uvs) = voxel_mesh.uvs {
            mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        }

        mesh.insert_indices(voxel_mesh.indices);
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VoxelConfig;
    use crate::pixels::PixelBuffer;

    fn sample_mesh(config: &VoxelConfig) -> VoxelMesh {
        let colors = vec![Rgba8::rgb(255, 0, 0), Rgba8::rgb(0, 0, 255)];
        let pixels = PixelBuffer::new(2, 1, colors).unwrap();
        build_voxel_mesh(&pixels, config)
    }

    #[test]
    fn test_mesh_name() {
        assert_eq!(voxel_mesh_name("hero"), "hero_voxelmesh");
        assert_eq!(voxel_mesh_name(""), VOXEL_NAME_POSTFIX);
    }

    #[test]
    fn test_default_is_empty() {
        let mesh = VoxelMesh::default();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert_eq!(mesh.cuboid_count(), 0);
    }

    #[test]
    fn test_bevy_mesh_basic_attributes() {
        let mesh: Mesh = sample_mesh(&VoxelConfig::default()).into();

        assert_eq!(mesh.count_vertices(), 48);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_POSITION).is_some());
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
        assert!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).is_none());
        assert!(mesh.attribute(Mesh::ATTRIBUTE_UV_0).is_none());
        assert_eq!(mesh.indices().map(Indices::len), Some(72));
    }

    #[test]
    fn test_bevy_mesh_optional_attributes() {
        let mut voxel_mesh = sample_mesh(&VoxelConfig::new().with_vertex_colors(true));
        voxel_mesh.uvs = Some(vec![[0.0, 0.5]; voxel_mesh.vertex_count()]);

        let mesh = voxel_mesh.to_mesh();
        assert_eq!(
            mesh.attribute(Mesh::ATTRIBUTE_COLOR).map(|a| a.len()),
            Some(48)
        );
        assert_eq!(
            mesh.attribute(Mesh::ATTRIBUTE_UV_0).map(|a| a.len()),
            Some(48)
        );
    }
}
