// src/preview/pool.rs
//! Reusable ghost previews for the object being placed.
//!
//! Ghosts live in an owned arena (`slots`) and are addressed by index only.
//! Every slot index sits in exactly one of `active` or `pooled`; the arena is
//! rebuilt from scratch only when the source prefab changes.

use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;

use super::components::{GhostMaterials, PreviewGhost, PreviewGhostPart};
use crate::prefab::{Prefab, PrefabId, PrefabLibrary};

#[derive(Debug)]
struct PreviewSlot {
    root: Entity,
    parts: Vec<Entity>,
}

#[derive(Resource, Debug)]
pub struct PreviewPool {
    materials: GhostMaterials,
    source: Option<PrefabId>,
    slots: Vec<PreviewSlot>,
    active: Vec<usize>,
    pooled: Vec<usize>,
    valid: bool,
}

impl PreviewPool {
    pub fn new(materials: GhostMaterials) -> Self {
        Self {
            materials,
            source: None,
            slots: Vec::new(),
            active: Vec::new(),
            pooled: Vec::new(),
            valid: true,
        }
    }

    pub fn source(&self) -> Option<PrefabId> { self.source }

    pub fn is_valid(&self) -> bool { self.valid }

    pub fn active_count(&self) -> usize { self.active.len() }

    pub fn pooled_count(&self) -> usize { self.pooled.len() }

    pub fn active_roots(&self) -> impl Iterator<Item = Entity> + '_ {
        self.active.iter().map(|&i| self.slots[i].root)
    }

    /// Single-position convenience for `show_multiple`.
    pub fn show(
        &mut self,
        commands: &mut Commands,
        library: &PrefabLibrary,
        source: PrefabId,
        position: Vec3,
        rotation: Quat,
    ) {
        self.show_multiple(commands, library, source, &[position], rotation);
    }

    /// Reconcile the active set to exactly one ghost per position.
    pub fn show_multiple(
        &mut self,
        commands: &mut Commands,
        library: &PrefabLibrary,
        source: PrefabId,
        positions: &[Vec3],
        rotation: Quat,
    ) {
        if positions.is_empty() {
            self.hide(commands);
            return;
        }
        let Some(prefab) = library.get(source) else {
            debug!("Preview: unknown prefab {:?}; hiding", source);
            self.hide(commands);
            return;
        };

        if self.source != Some(source) {
            self.destroy_all(commands);
            self.source = Some(source);
        }

        // Shrink from the tail.
        while self.active.len() > positions.len() {
            let Some(slot) = self.active.pop() else { break; };
            commands.entity(self.slots[slot].root).insert(Visibility::Hidden);
            self.pooled.push(slot);
        }

        // Grow from the pool first, then spawn.
        while self.active.len() < positions.len() {
            let slot = match self.pooled.pop() {
                Some(slot) => {
                    self.tint_slot(commands, slot);
                    slot
                }
                None => self.spawn_slot(commands, prefab),
            };
            self.active.push(slot);
        }

        for (&slot, &position) in self.active.iter().zip(positions) {
            commands.entity(self.slots[slot].root).insert((
                Transform::from_translation(position)
                    .with_rotation(rotation)
                    .with_scale(prefab.authored_scale),
                Visibility::Visible,
            ));
        }
    }

    /// Re-tint active ghosts; no-op when the state is unchanged.
    pub fn set_valid(&mut self, commands: &mut Commands, valid: bool) {
        if self.valid == valid { return; }
        self.valid = valid;
        for &slot in &self.active {
            self.tint_slot(commands, slot);
        }
    }

    /// Deactivate every active ghost into the pool (nothing is destroyed).
    pub fn hide(&mut self, commands: &mut Commands) {
        for slot in std::mem::take(&mut self.active) {
            commands.entity(self.slots[slot].root).insert(Visibility::Hidden);
            self.pooled.push(slot);
        }
    }

    fn tint_slot(&self, commands: &mut Commands, slot: usize) {
        let material = self.materials.for_validity(self.valid);
        for &part in &self.slots[slot].parts {
            commands.entity(part).insert(MeshMaterial3d(material.clone()));
        }
    }

    fn destroy_all(&mut self, commands: &mut Commands) {
        for slot in self.slots.drain(..) {
            commands.entity(slot.root).despawn();
        }
        self.active.clear();
        self.pooled.clear();
    }

    /// Build a ghost from the prefab definition, never from the live object: no
    /// capability record, no shadows, renderers always enabled.
    fn spawn_slot(&mut self, commands: &mut Commands, prefab: &Prefab) -> usize {
        let index = self.slots.len();
        let material = self.materials.for_validity(self.valid).clone();

        let root = commands
            .spawn((
                PreviewGhost { slot: index },
                Transform::default(),
                Visibility::Hidden,
                Name::new(format!("Preview ghost {} ({})", index, prefab.name)),
            ))
            .id();

        let mut parts = Vec::with_capacity(prefab.parts.len());
        for part in &prefab.parts {
            let child = commands
                .spawn((
                    PreviewGhostPart,
                    Mesh3d(part.mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(part.offset),
                    Visibility::Inherited,
                    NotShadowCaster,
                    NotShadowReceiver,
                ))
                .id();
            commands.entity(root).add_child(child);
            parts.push(child);
        }

        self.slots.push(PreviewSlot { root, parts });
        index
    }
}

/// Startup: create the tint materials and the pool, unless something already provided one.
pub fn init_preview_pool(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(PreviewPool::new(GhostMaterials::create(&mut materials)));
}
