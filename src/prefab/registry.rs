// src/prefab/registry.rs
//! Data-driven placeable prefabs + loader.

use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------- Public plugin to register asset+loader ----------

pub struct PrefabRegistryAssetPlugin;

impl Plugin for PrefabRegistryAssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<PrefabRegistry>()
            .register_asset_loader(PrefabRegistryLoader);
    }
}

// ---------- Render parts (data form) ----------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PartShape {
    Cuboid { size: Vec3 },
    Sphere { radius: f32 },
    Cylinder { radius: f32, height: f32 },
    /// Mesh asset path, labels allowed (e.g. `models/lamp.glb#Mesh0/Primitive0`).
    Mesh { path: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartDef {
    pub shape: PartShape,
    /// sRGB base color.
    #[serde(default = "default_color")]
    pub color: (f32, f32, f32),
    /// Local offset from the prefab root.
    #[serde(default)]
    pub offset: Vec3,
}

fn default_color() -> (f32, f32, f32) {
    (0.8, 0.8, 0.8)
}

// ---------- Prefab definition (data form) ----------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrefabDef {
    /// Unique human-readable name (used for lookup).
    pub name: String,

    /// Visual parts; at least one.
    pub parts: Vec<PartDef>,

    /// Authored scale. Placed copies and ghosts always use this, never the live scale.
    #[serde(default = "default_scale")]
    pub scale: Vec3,
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

// ---------- Runtime registry asset ----------

#[derive(Asset, TypePath, Clone, Debug)]
pub struct PrefabRegistry {
    /// Ordered list; index in this vector is the `PrefabId.0`.
    pub prefabs: Vec<PrefabDef>,
    /// Name → index for quick lookups.
    pub name_to_index: HashMap<String, u32>,
}

impl PrefabRegistry {
    /// Validate and index a parsed definition list.
    pub fn from_defs(defs: Vec<PrefabDef>) -> Result<Self, PrefabRegistryLoadError> {
        let mut name_to_index = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if def.parts.is_empty() {
                return Err(PrefabRegistryLoadError::Empty { name: def.name.clone() });
            }
            if let Some(prev) = name_to_index.insert(def.name.clone(), i as u32) {
                return Err(PrefabRegistryLoadError::DuplicateName {
                    name: def.name.clone(),
                    first: prev,
                    second: i as u32,
                });
            }
        }
        Ok(Self { prefabs: defs, name_to_index })
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, PrefabRegistryLoadError> {
        let defs: Vec<PrefabDef> =
            ron::de::from_bytes(bytes).map_err(|e| PrefabRegistryLoadError::Ron(e.to_string()))?;
        Self::from_defs(defs)
    }

    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.name_to_index.get(name).copied()
    }
}

// ---------- Asset loader for `.prefabs.ron` ----------

#[derive(Default)]
pub struct PrefabRegistryLoader;

impl AssetLoader for PrefabRegistryLoader {
    type Asset = PrefabRegistry;
    type Settings = ();
    type Error = PrefabRegistryLoadError;

    fn extensions(&self) -> &[&str] {
        &["prefabs.ron"]
    }

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        PrefabRegistry::parse(&bytes)
    }
}

// ---------- Loader errors ----------

#[derive(thiserror::Error, Debug)]
pub enum PrefabRegistryLoadError {
    #[error("I/O while reading prefab registry: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
    #[error("Duplicate prefab name '{name}' (first idx {first}, second idx {second})")]
    DuplicateName { name: String, first: u32, second: u32 },
    #[error("Prefab '{name}' has no parts")]
    Empty { name: String },
}
