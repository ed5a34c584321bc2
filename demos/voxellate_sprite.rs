//! Voxellates a small procedural sprite two ways: through the plugin with a
//! palette texture, and directly with per-vertex colors.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy_voxellator::prelude::*;

const SIZE: u32 = 16;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(VoxellatorPlugin)
        .insert_resource(VoxelMaterialSettings {
            perceptual_roughness: 0.7,
            unlit: false,
        })
        .add_systems(Startup, setup)
        .add_systems(Update, spin)
        .run();
}

#[derive(Component)]
struct Spin;

fn setup(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let pixels = heart_sprite();

    // Through the plugin: picked up by `voxellate_sprites` next frame
    let image = images.add(to_image(&pixels));
    let depth = images.add(to_image(&radial_depth_map()));
    commands.spawn((
        VoxelSprite::new(image)
            .with_extrusion_map(depth)
            .with_extrusion_factor(2.0)
            .with_name("heart"),
        Transform::from_xyz(-1.0, 0.0, 0.0),
        Spin,
    ));

    // Directly: vertex colors, no palette
    let config = VoxelConfig::new()
        .with_vertex_colors(true)
        .with_palette(false);
    let voxellation = voxellate(&pixels, &config);
    commands.spawn((
        Mesh3d(meshes.add(voxellation.bevy_mesh())),
        MeshMaterial3d(materials.add(StandardMaterial::default())),
        Transform::from_xyz(1.0, 0.0, 0.0),
        Spin,
    ));

    commands.spawn((
        PointLight {
            intensity: 2000.0,
            ..default()
        },
        Transform::from_xyz(2.0, 4.0, 4.0),
    ));

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.5, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spin(time: Res<Time>, mut query: Query<&mut Transform, With<Spin>>) {
    for mut transform in &mut query {
        transform.rotate_y(time.delta_secs() * 0.6);
    }
}

/// A heart shape, rows bottom to top.
fn heart_sprite() -> PixelBuffer<'static> {
    let red = Rgba8::rgb(220, 30, 60);
    let pink = Rgba8::rgb(255, 140, 170);
    PixelBuffer::from_fn(SIZE, SIZE, |w, h| {
        let x = (w as f32 + 0.5) / SIZE as f32 * 2.0 - 1.0;
        let y = (h as f32 + 0.5) / SIZE as f32 * 2.0 - 1.0;
        let f = (x * x + y * y - 0.5).powi(3) - x * x * y * y * y;
        if f > 0.0 {
            Rgba8::TRANSPARENT
        } else if x < -0.2 && y > 0.2 {
            pink
        } else {
            red
        }
    })
}

/// Dark in the middle, light at the edges.
fn radial_depth_map() -> PixelBuffer<'static> {
    PixelBuffer::from_fn(SIZE, SIZE, |w, h| {
        let dx = w as f32 - SIZE as f32 / 2.0;
        let dy = h as f32 - SIZE as f32 / 2.0;
        let t = ((dx * dx + dy * dy).sqrt() / (SIZE as f32 / 2.0)).min(1.0);
        let v = (t * 255.0) as u8;
        Rgba8::rgb(v, v, v)
    })
}

/// Bevy images store rows top to bottom.
fn to_image(pixels: &PixelBuffer) -> Image {
    let mut data = Vec::with_capacity(pixels.len() * 4);
    for h in (0..pixels.height()).rev() {
        for w in 0..pixels.width() {
            data.extend_from_slice(&pixels.get_clamped(w, h).to_array());
        }
    }

    Image::new(
        Extent3d {
            width: pixels.width(),
            height: pixels.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}
