//! Plugin that voxellates sprites in a running Bevy app.
use bevy::math::URect;
use bevy::prelude::*;

use crate::config::VoxelConfig;
use crate::mesh::voxel_mesh_name;
use crate::pixels::{PixelSourceError, pixel_buffer_from_image};
use crate::voxellate::{Voxellation, voxellate};

/// Plugin that turns [`VoxelSprite`] entities into voxel meshes.
///
/// This plugin registers:
/// - [`VoxelMaterialSettings`] with default values
/// - the [`voxellate_sprites`] system in `Update`
///
/// # Example
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_voxellator::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(VoxellatorPlugin)
///     .run();
/// ```
pub struct VoxellatorPlugin;

impl Plugin for VoxellatorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VoxelMaterialSettings>()
            .add_systems(Update, voxellate_sprites.in_set(VoxellatorSystems));
    }
}

/// System set for voxellation systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoxellatorSystems;

/// Material settings for spawned voxel meshes.
#[derive(Resource, Clone, Debug)]
pub struct VoxelMaterialSettings {
    /// Default: 0.9
    pub perceptual_roughness: f32,

    /// Skip lighting and show the sprite colors as-is.
    ///
    /// Default: false
    pub unlit: bool,
}

impl Default for VoxelMaterialSettings {
    fn default() -> Self {
        Self {
            perceptual_roughness: 0.9,
            unlit: false,
        }
    }
}

/// A sprite to be voxellated once its images are loaded.
///
/// The entity receives `Mesh3d`, `MeshMaterial3d<StandardMaterial>`, a
/// [`Name`] of the form `<name>_voxelmesh` and the [`Voxellated`] marker.
#[derive(Component, Clone, Debug)]
pub struct VoxelSprite {
    pub image: Handle<Image>,

    /// Sub-rectangle of `image` in pixels, for atlas-packed sprites.
    pub rect: Option<URect>,

    /// Greyscale depth map. Darker pixels extrude further.
    pub extrusion_map: Option<Handle<Image>>,

    pub scale: f32,
    pub extrusion_factor: f32,

    /// Color the mesh with per-vertex colors instead of a palette texture.
    pub vertex_colors: bool,
    pub name: String,
}

impl VoxelSprite {
    pub fn new(image: Handle<Image>) -> Self {
        Self {
            image,
            rect: None,
            extrusion_map: None,
            scale: 1.0,
            extrusion_factor: 1.0,
            vertex_colors: false,
            name: String::from("sprite"),
        }
    }

    pub fn with_rect(mut self, rect: URect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_extrusion_map(mut self, map: Handle<Image>) -> Self {
        self.extrusion_map = Some(map);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_extrusion_factor(mut self, factor: f32) -> Self {
        self.extrusion_factor = factor;
        self
    }

    pub fn with_vertex_colors(mut self, enable: bool) -> Self {
        self.vertex_colors = enable;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Marker for sprites that have been processed.
#[derive(Component, Debug)]
pub struct Voxellated;

/// Marker for sprites whose pixels could not be read. They are not retried.
#[derive(Component, Debug)]
pub struct VoxellationFailed;

/// System that voxellates every pending [`VoxelSprite`].
///
/// Sprites whose images are still loading are skipped until a later frame.
pub fn voxellate_sprites(
    mut commands: Commands,
    sprites: Query<(Entity, &VoxelSprite), (Without<Voxellated>, Without<VoxellationFailed>)>,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<VoxelMaterialSettings>,
) {
    for (entity, sprite) in &sprites {
        let voxellation = match read_and_voxellate(sprite, &images) {
            Ok(Some(voxellation)) => voxellation,
            // Not all images loaded yet
            Ok(None) => continue,
            Err(err) => {
                error!("Failed to voxellate sprite '{}': {}", sprite.name, err);
                commands.entity(entity).insert(VoxellationFailed);
                continue;
            }
        };

        let name = voxel_mesh_name(&sprite.name);
        if voxellation.mesh.is_empty() {
            warn!("Sprite '{}' has no opaque pixels; nothing to mesh", sprite.name);
            commands.entity(entity).insert((Name::new(name), Voxellated));
            continue;
        }

        let palette = voxellation.palette_image().map(|image| images.add(image));
        let material = materials.add(StandardMaterial {
            base_color: Color::WHITE,
            base_color_texture: palette,
            perceptual_roughness: settings.perceptual_roughness,
            unlit: settings.unlit,
            ..default()
        });
        let mesh = meshes.add(voxellation.bevy_mesh());

        info!(
            "Voxellated '{}' into {} cuboids",
            sprite.name,
            voxellation.mesh.cuboid_count()
        );

        commands.entity(entity).insert((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Name::new(name),
            Voxellated,
        ));
    }
}

/// Runs the pipeline for one sprite. `Ok(None)` means an image is not
/// loaded yet.
fn read_and_voxellate(
    sprite: &VoxelSprite,
    images: &Assets<Image>,
) -> Result<Option<Voxellation>, PixelSourceError> {
    let Some(image) = images.get(&sprite.image) else {
        return Ok(None);
    };

    let extrusion_map = match &sprite.extrusion_map {
        Some(handle) => match images.get(handle) {
            Some(map) => Some(pixel_buffer_from_image(map, None)?),
            None => return Ok(None),
        },
        None => None,
    };

    let pixels = pixel_buffer_from_image(image, sprite.rect)?;
    let config = VoxelConfig {
        scale: sprite.scale,
        extrusion_factor: sprite.extrusion_factor,
        extrusion_map,
        apply_color_per_vertex: sprite.vertex_colors,
        // The material multiplies both sources, so only one may be present.
        generate_palette: !sprite.vertex_colors,
    };

    Ok(Some(voxellate(&pixels, &config)))
}
