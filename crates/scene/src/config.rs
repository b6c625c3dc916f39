use artwalk_field::FieldConfig;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::loader::SceneError;

fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// The scene's three light sources. Colors are linear RGB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightRig {
    pub hemisphere_sky: [f32; 3],
    pub hemisphere_ground: [f32; 3],
    pub hemisphere_intensity: f32,
    pub hemisphere_direction: Vec3,
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            hemisphere_sky: rgb(0xeeeeff),
            hemisphere_ground: rgb(0x777788),
            hemisphere_intensity: 0.75,
            hemisphere_direction: Vec3::new(0.5, 1.0, 0.75),
            directional_color: rgb(0xffffff),
            directional_intensity: 0.9,
            ambient_color: rgb(0x1a00ff),
            ambient_intensity: 0.99,
        }
    }
}

/// A model to load and place in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPlacement {
    pub path: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl ModelPlacement {
    pub fn new(path: &str, position: Vec3, rotation: Vec3, scale: f32) -> Self {
        Self {
            path: path.to_string(),
            position,
            rotation,
            scale: Vec3::splat(scale),
        }
    }
}

/// A flat quad placed in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanePlacement {
    /// Image intended for the quad. Carried for scene authoring; the wgpu
    /// backend does not sample it and draws the plane as a flat lit quad.
    pub texture: String,
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
}

/// Everything that defines the art space, minus runtime state. Serializable
/// so alternate spaces can be authored as JSON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub background: [f32; 3],
    pub lights: LightRig,
    pub field: FieldConfig,
    pub models: Vec<ModelPlacement>,
    pub planes: Vec<PlanePlacement>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let z = Vec3::ZERO;
        Self {
            background: rgb(0x8e0003),
            lights: LightRig::default(),
            field: FieldConfig::default(),
            models: vec![
                ModelPlacement::new("assets/blob.glb", Vec3::new(100.0, -100.0, 100.0), z, 20.0),
                ModelPlacement::new("assets/blob2.glb", Vec3::new(7.0, 50.0, 1.0), z, 10.0),
                ModelPlacement::new("assets/blob3.glb", Vec3::new(-300.0, 5.0, 200.0), z, 8.0),
                ModelPlacement::new("assets/blob4.glb", Vec3::new(-200.0, 100.0, 500.0), z, 10.0),
                ModelPlacement::new(
                    "assets/blob.glb",
                    Vec3::new(-400.0, 10.0, 500.0),
                    Vec3::new(30.0, 100.0, 0.0),
                    20.0,
                ),
                ModelPlacement::new(
                    "assets/blob2.glb",
                    Vec3::new(-400.0, -300.0, 500.0),
                    Vec3::new(100.0, 100.0, 0.0),
                    50.0,
                ),
                ModelPlacement::new(
                    "assets/blob5.glb",
                    Vec3::new(10.0, 20.0, 500.0),
                    Vec3::new(50.0, 100.0, 0.0),
                    20.0,
                ),
            ],
            planes: vec![PlanePlacement {
                texture: "assets/reality.jpg".to_string(),
                position: Vec3::new(0.0, 15.0, -300.0),
                width: 500.0,
                height: 500.0,
            }],
        }
    }
}

impl SceneConfig {
    /// Multi-color variant: a larger rainbow-tinted swarm boxed in against
    /// the x and z boundaries, no surrounding models.
    pub fn multicolor_walled() -> Self {
        Self {
            background: rgb(0x000010),
            field: FieldConfig {
                blob_count: 12,
                multi_color: true,
                wall_x: true,
                wall_z: true,
                ..FieldConfig::default()
            },
            models: Vec::new(),
            planes: Vec::new(),
            ..Self::default()
        }
    }

    /// Sparse variant: a handful of slow blobs on a finer grid.
    pub fn sparse_field() -> Self {
        Self {
            field: FieldConfig {
                blob_count: 4,
                resolution: 50,
                speed: 0.5,
                ..FieldConfig::default()
            },
            ..Self::default()
        }
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_has_seven_models_and_one_plane() {
        let config = SceneConfig::default();
        assert_eq!(config.models.len(), 7);
        assert_eq!(config.planes.len(), 1);
        assert!(config.background[0] > 0.5, "deep red background");
        assert_eq!(config.background[1], 0.0);
    }

    #[test]
    fn every_preset_builds_and_round_trips() {
        for config in [
            SceneConfig::default(),
            SceneConfig::multicolor_walled(),
            SceneConfig::sparse_field(),
        ] {
            let json = serde_json::to_string(&config).unwrap();
            let loaded: SceneConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(loaded, config);
        }

        let walled = SceneConfig::multicolor_walled();
        assert!(walled.field.multi_color);
        assert!(walled.field.wall_x && walled.field.wall_z);
        assert_eq!(walled.field.blob_count, 12);

        let sparse = SceneConfig::sparse_field();
        assert_eq!(sparse.field.resolution, 50);
        assert_eq!(sparse.field.blob_count, 4);
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = SceneConfig::default();
        config.save(tmp.path()).unwrap();
        let loaded = SceneConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: SceneConfig = serde_json::from_str(r#"{"models": []}"#).unwrap();
        assert!(config.models.is_empty());
        assert_eq!(config.field, FieldConfig::default());
        assert_eq!(config.planes.len(), 1);
    }
}
