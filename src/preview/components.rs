use bevy::prelude::*;

/// Root of a preview ghost. `slot` indexes the pool arena.
#[derive(Component, Clone, Copy, Debug)]
pub struct PreviewGhost {
    pub slot: usize,
}

/// Mesh-bearing child of a ghost.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct PreviewGhostPart;

/// The two shared tint materials. Ghost parts swap between these handles
/// instead of mutating or instancing materials.
#[derive(Clone, Debug)]
pub struct GhostMaterials {
    pub valid: Handle<StandardMaterial>,
    pub invalid: Handle<StandardMaterial>,
}

impl GhostMaterials {
    pub fn create(materials: &mut Assets<StandardMaterial>) -> Self {
        let tint = |r: f32, g: f32, b: f32| StandardMaterial {
            base_color: Color::srgba(r, g, b, 0.35),
            emissive: LinearRgba::rgb(r * 0.4, g * 0.4, b * 0.4),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        };
        Self {
            valid: materials.add(tint(0.2, 0.9, 0.35)),
            invalid: materials.add(tint(0.95, 0.2, 0.2)),
        }
    }

    pub fn for_validity(&self, valid: bool) -> &Handle<StandardMaterial> {
        if valid { &self.valid } else { &self.invalid }
    }
}

#[cfg(test)]
impl GhostMaterials {
    /// Distinct weak handles for headless worlds without an asset store.
    pub(crate) fn placeholder() -> Self {
        Self {
            valid: Handle::weak_from_u128(0x6a1d_0001),
            invalid: Handle::weak_from_u128(0x6a1d_0002),
        }
    }
}
