//! # bevy_voxellator
//!
//! Turns flat sprite pixel art into extruded voxel meshes for Bevy.
//!
//! Every opaque pixel becomes one cuboid. Colors are carried either as
//! per-vertex colors or through a compact palette texture that the mesh's
//! UVs point into.
//!
//! ## Features
//!
//! - One 24-vertex cuboid per opaque pixel, centered on the origin
//! - Optional greyscale extrusion map for per-pixel depth
//! - Deduplicated 1xK palette texture with nearest sampling
//! - Per-vertex colors in linear space
//! - 16-bit indices for small sprites, 32-bit for large ones
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_voxellator::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(VoxellatorPlugin)
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.spawn(
//!         VoxelSprite::new(asset_server.load("sprites/hero.png"))
//!             .with_scale(2.0)
//!             .with_name("hero"),
//!     );
//! }
//! ```
//!
//! Without the plugin, the pipeline runs on any [`pixels::PixelBuffer`]:
//!
//! ```
//! use bevy_voxellator::prelude::*;
//!
//! let red = Rgba8::rgb(255, 0, 0);
//! let pixels = PixelBuffer::new(2, 1, vec![red, Rgba8::TRANSPARENT]).unwrap();
//! let result = voxellate(&pixels, &VoxelConfig::default());
//!
//! assert_eq!(result.mesh.vertex_count(), 24);
//! assert_eq!(result.palette.map(|p| p.len()), Some(1));
//! ```

pub mod config;
pub mod extrusion;
pub mod mesh;
pub mod palette;
pub mod pixels;
#[cfg(feature = "plugin")]
mod plugin;
pub mod voxellate;

pub mod prelude {
    pub use crate::config::{VOXEL_SCALE_FACTOR, VoxelConfig};
    pub use crate::extrusion::extrusion;
    pub use crate::mesh::{
        Cuboid, CuboidFace, VoxelMesh, VoxelMeshBuilder, assign_vertex_colors, build_voxel_mesh,
    };
    pub use crate::palette::{PaletteBuilder, PaletteTexture, apply_palette_uvs, generate_palette};
    pub use crate::pixels::{PixelBuffer, PixelSourceError, Rgba8, pixel_buffer_from_image};
    pub use crate::voxellate::{Voxellation, voxellate, voxellate_image};

    #[cfg(feature = "plugin")]
    pub use crate::plugin::{
        VoxelMaterialSettings, VoxelSprite, Voxellated, VoxellationFailed, VoxellatorPlugin,
        VoxellatorSystems, voxellate_sprites,
    };
}
