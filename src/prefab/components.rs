use bevy::prelude::*;

/// Index of a prefab in the library (stable during a session).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrefabId(pub u32);

/// Capability record: present on every object the grid may hold.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Placeable {
    /// Which prefab this object was built from (also keys the preview pool).
    pub prefab: PrefabId,
    /// Scale as authored in the prefab definition.
    pub authored_scale: Vec3,
}

/// Mesh-bearing child entities, recorded at spawn for visibility toggling.
#[derive(Component, Clone, Debug, Default, Deref, DerefMut)]
pub struct RendererParts(pub Vec<Entity>);

/// Frozen into the grid (registered in the occupancy table).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Placed;
