// src/prefab/library.rs
//! Runtime prefab library (built meshes/materials) and the spawn helpers
//! shared by the session, the preview pool and level loaders.

use bevy::prelude::*;
use std::collections::HashMap;

use super::components::{Placeable, Placed, PrefabId, RendererParts};
use super::registry::{PartShape, PrefabRegistry};
use crate::grid::{CellCoord, GridIndex};

#[derive(Clone, Debug)]
pub struct PrefabPart {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    /// Local offset from the prefab root.
    pub offset: Vec3,
}

#[derive(Clone, Debug)]
pub struct Prefab {
    pub name: String,
    pub parts: Vec<PrefabPart>,
    pub authored_scale: Vec3,
}

#[derive(Resource, Clone, Debug, Default)]
pub struct PrefabLibrary {
    prefabs: Vec<Prefab>,
    by_name: HashMap<String, PrefabId>,
}

impl PrefabLibrary {
    pub fn from_prefabs(prefabs: Vec<Prefab>) -> Self {
        let by_name = prefabs
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), PrefabId(i as u32)))
            .collect();
        Self { prefabs, by_name }
    }

    /// Turn registry definitions into render handles. Indices are preserved,
    /// so `PrefabId(i)` here names the same prefab as registry entry `i`.
    pub fn build(
        registry: &PrefabRegistry,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        assets: &AssetServer,
    ) -> Self {
        let prefabs = registry
            .prefabs
            .iter()
            .map(|def| Prefab {
                name: def.name.clone(),
                authored_scale: def.scale,
                parts: def
                    .parts
                    .iter()
                    .map(|part| {
                        let mesh = match &part.shape {
                            PartShape::Cuboid { size } => meshes.add(Cuboid::from_size(*size)),
                            PartShape::Sphere { radius } => meshes.add(Sphere::new(*radius)),
                            PartShape::Cylinder { radius, height } => {
                                meshes.add(Cylinder::new(*radius, *height))
                            }
                            PartShape::Mesh { path } => assets.load(path.clone()),
                        };
                        let (r, g, b) = part.color;
                        let material = materials.add(StandardMaterial {
                            base_color: Color::srgb(r, g, b),
                            perceptual_roughness: 0.8,
                            ..default()
                        });
                        PrefabPart { mesh, material, offset: part.offset }
                    })
                    .collect(),
            })
            .collect();
        Self::from_prefabs(prefabs)
    }

    pub fn get(&self, id: PrefabId) -> Option<&Prefab> {
        self.prefabs.get(id.0 as usize)
    }

    pub fn id_of(&self, name: &str) -> Option<PrefabId> {
        self.by_name.get(name).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = PrefabId> + '_ {
        (0..self.prefabs.len() as u32).map(PrefabId)
    }

    pub fn len(&self) -> usize { self.prefabs.len() }

    pub fn is_empty(&self) -> bool { self.prefabs.is_empty() }
}

/// Spawn a grabbable object (capability record + renderer parts). Not registered in the grid.
pub fn spawn_placeable(
    commands: &mut Commands,
    library: &PrefabLibrary,
    id: PrefabId,
    transform: Transform,
) -> Option<Entity> {
    let prefab = library.get(id)?;

    let root = commands
        .spawn((
            Placeable { prefab: id, authored_scale: prefab.authored_scale },
            transform,
            Visibility::Visible,
            Name::new(prefab.name.clone()),
        ))
        .id();

    let mut parts = Vec::with_capacity(prefab.parts.len());
    for (i, part) in prefab.parts.iter().enumerate() {
        let child = commands
            .spawn((
                Mesh3d(part.mesh.clone()),
                MeshMaterial3d(part.material.clone()),
                Transform::from_translation(part.offset),
                Visibility::Inherited,
                Name::new(format!("{} part {}", prefab.name, i)),
            ))
            .id();
        commands.entity(root).add_child(child);
        parts.push(child);
    }
    commands.entity(root).insert(RendererParts(parts));

    Some(root)
}

/// Restore/stamp one object into a cell: spawned at the cell center with the
/// authored scale, frozen as `Placed` and registered in the grid.
/// Returns `None` (spawning nothing) when the cell is taken or the prefab is unknown.
pub fn spawn_placed(
    commands: &mut Commands,
    library: &PrefabLibrary,
    grid: &mut GridIndex,
    id: PrefabId,
    cell: CellCoord,
    rotation: Quat,
) -> Option<Entity> {
    if grid.is_occupied(cell) {
        return None;
    }
    let prefab = library.get(id)?;
    let transform = Transform::from_translation(grid.cell_to_world(cell))
        .with_rotation(rotation)
        .with_scale(prefab.authored_scale);

    let entity = spawn_placeable(commands, library, id, transform)?;
    commands.entity(entity).insert(Placed);
    grid.occupy(cell, entity);
    Some(entity)
}
