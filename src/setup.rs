use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use gridstamp::config::DemoSettings;
use gridstamp::grid::{CellCoord, GridIndex, GridVisualizer};
use gridstamp::prefab::{spawn_placeable, spawn_placed, PrefabLibrary};
use gridstamp::session::{Controller, Hand};

use crate::input::CameraOrbit;

#[derive(Component)]
pub struct MainCamera;

pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // 1) Light
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    // 2) Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-2.5, 4.5, 9.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
        CameraOrbit {
            focus: Vec3::ZERO,
            radius: 12.0,
            yaw: 1.2,
            pitch: 0.6,
        },
    ));

    // 3) Floor
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(20.0, 20.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.27, 0.3),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::default(),
    ));

    // 4) Hands. The right one is keyboard-driven; the left only feeds the dolly stick.
    let hand_mesh = meshes.add(Sphere::new(0.08));
    for (hand, x, color) in [
        (Hand::Right, 0.5, Color::srgb(0.9, 0.6, 0.2)),
        (Hand::Left, -0.5, Color::srgb(0.2, 0.6, 0.9)),
    ] {
        commands.spawn((
            Controller { hand },
            Mesh3d(hand_mesh.clone()),
            MeshMaterial3d(materials.add(StandardMaterial { base_color: color, ..default() })),
            Transform::from_xyz(x, 1.0, 6.0),
            Name::new(format!("{:?} hand", hand)),
        ));
    }
}

/// Once the prefab library is built: one loose copy of every prefab to grab,
/// plus a seeded scatter restored straight into the grid.
pub fn spawn_demo_level(
    mut commands: Commands,
    library: Option<Res<PrefabLibrary>>,
    grid: Option<ResMut<GridIndex>>,
    visualizer: Option<Res<GridVisualizer>>,
    settings: Res<DemoSettings>,
    mut done: Local<bool>,
) {
    if *done { return; }
    let (Some(library), Some(mut grid)) = (library, grid) else { return; };
    *done = true;

    for (i, id) in library.ids().enumerate() {
        let at = Vec3::new(i as f32 * 0.8 - 1.0, 0.5, 5.0);
        spawn_placeable(&mut commands, &library, id, Transform::from_translation(at));
    }

    let vis = visualizer.map(|v| *v).unwrap_or_default();
    let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
    let ids: Vec<_> = library.ids().collect();
    let mut restored = 0;
    // Bounded: a crowded cage may not have room for every request.
    for _ in 0..settings.restored_count * 8 {
        if restored == settings.restored_count || ids.is_empty() { break; }
        let r = vis.half_range;
        let cell = CellCoord::new(
            vis.center.x + rng.random_range(-r..=r),
            vis.center.y,
            vis.center.z + rng.random_range(-r..=r),
        );
        let id = ids[rng.random_range(0..ids.len())];
        let yaw = grid.quantize_yaw(rng.random_range(0.0..360.0));
        if spawn_placed(&mut commands, &library, &mut grid, id, cell, yaw).is_some() {
            restored += 1;
        }
    }
    info!("Demo: {} loose prefab(s), {} restored into the grid", library.len(), restored);
}
