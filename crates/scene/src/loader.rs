use artwalk_common::Aabb;
use glam::Vec3;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Errors from scene assembly and model loading.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("glTF parse error: {0}")]
    GltfParse(String),
}

/// Content-addressed model ID computed from the file bytes. The same file
/// placed twice in the scene resolves to the same ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub u64);

/// Metadata extracted from one glTF/GLB file: enough to place a collision
/// box and report what loaded. Vertex data stays on the GPU path.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub id: ModelId,
    pub name: String,
    pub mesh_count: usize,
    /// Union of the POSITION accessor bounds, in model-local units.
    pub bounds: Aabb,
}

/// Reads glTF JSON metadata and derives collision bounds.
///
/// Handles both `.gltf` (JSON) and `.glb` (binary container, JSON chunk
/// extracted). Vertex buffers are not parsed here.
#[derive(Debug, Default)]
pub struct ModelLoader;

impl ModelLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadedModel, SceneError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let id = content_id(&bytes);

        let json = gltf_json(&bytes)?;
        let mesh_count = json
            .get("meshes")
            .and_then(|m| m.as_array())
            .map_or(0, |m| m.len());
        let bounds = position_bounds(&json).unwrap_or_else(|| {
            tracing::warn!("no accessor bounds; using placeholder unit bounds");
            Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5))
        });

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();
        tracing::info!(%name, mesh_count, "model loaded");

        Ok(LoadedModel {
            id,
            name,
            mesh_count,
            bounds,
        })
    }
}

fn content_id(bytes: &[u8]) -> ModelId {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut id = [0u8; 8];
    id.copy_from_slice(&digest[..8]);
    ModelId(u64::from_le_bytes(id))
}

/// The glTF JSON document, whether the file is raw JSON or a GLB container.
fn gltf_json(bytes: &[u8]) -> Result<serde_json::Value, SceneError> {
    if bytes.starts_with(b"glTF") {
        // GLB: 12-byte header, then chunks of (length, type, data). The
        // first chunk must be the JSON document.
        if bytes.len() < 20 {
            return Err(SceneError::GltfParse("truncated GLB header".into()));
        }
        let len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;
        let ty = &bytes[16..20];
        if ty != b"JSON" {
            return Err(SceneError::GltfParse("first GLB chunk is not JSON".into()));
        }
        let end = 20 + len;
        if bytes.len() < end {
            return Err(SceneError::GltfParse("truncated GLB JSON chunk".into()));
        }
        Ok(serde_json::from_slice(&bytes[20..end])?)
    } else {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Union of every min/max-annotated VEC3 accessor. In practice these are the
/// POSITION accessors, which is all the collision box needs.
fn position_bounds(json: &serde_json::Value) -> Option<Aabb> {
    let accessors = json.get("accessors")?.as_array()?;
    let mut bounds: Option<Aabb> = None;
    for accessor in accessors {
        if accessor.get("type").and_then(|t| t.as_str()) != Some("VEC3") {
            continue;
        }
        let (Some(min), Some(max)) = (vec3_field(accessor, "min"), vec3_field(accessor, "max"))
        else {
            continue;
        };
        bounds = Some(match bounds {
            Some(b) => Aabb::new(b.min.min(min), b.max.max(max)),
            None => Aabb::new(min, max),
        });
    }
    bounds
}

fn vec3_field(accessor: &serde_json::Value, key: &str) -> Option<Vec3> {
    let arr = accessor.get(key)?.as_array()?;
    if arr.len() != 3 {
        return None;
    }
    Some(Vec3::new(
        arr[0].as_f64()? as f32,
        arr[1].as_f64()? as f32,
        arr[2].as_f64()? as f32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_GLTF: &str = r#"{
        "asset": {"version": "2.0"},
        "meshes": [{"name": "blob", "primitives": [{"attributes": {"POSITION": 0}}]}],
        "accessors": [{
            "type": "VEC3",
            "componentType": 5126,
            "count": 3,
            "min": [-1.0, -2.0, -1.0],
            "max": [1.0, 2.0, 1.0]
        }]
    }"#;

    fn write_temp(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(contents).unwrap();
        tmp
    }

    #[test]
    fn loads_gltf_json_metadata() {
        let tmp = write_temp(MINIMAL_GLTF.as_bytes());
        let model = ModelLoader::new().load(tmp.path()).unwrap();
        assert_eq!(model.mesh_count, 1);
        assert_eq!(model.bounds.min, Vec3::new(-1.0, -2.0, -1.0));
        assert_eq!(model.bounds.max, Vec3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn loads_glb_container() {
        let json = MINIMAL_GLTF.as_bytes();
        let mut glb = Vec::new();
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&((20 + json.len()) as u32).to_le_bytes());
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(json);

        let tmp = write_temp(&glb);
        let model = ModelLoader::new().load(tmp.path()).unwrap();
        assert_eq!(model.mesh_count, 1);
    }

    #[test]
    fn identical_bytes_share_a_content_id() {
        let a = write_temp(MINIMAL_GLTF.as_bytes());
        let b = write_temp(MINIMAL_GLTF.as_bytes());
        let loader = ModelLoader::new();
        assert_eq!(
            loader.load(a.path()).unwrap().id,
            loader.load(b.path()).unwrap().id
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ModelLoader::new().load("does/not/exist.glb").unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let tmp = write_temp(b"not a gltf file");
        let err = ModelLoader::new().load(tmp.path()).unwrap_err();
        assert!(matches!(err, SceneError::Json(_)));
    }

    #[test]
    fn missing_bounds_fall_back_to_unit_box() {
        let tmp = write_temp(br#"{"asset": {"version": "2.0"}, "meshes": []}"#);
        let model = ModelLoader::new().load(tmp.path()).unwrap();
        assert_eq!(model.bounds.min, Vec3::splat(-0.5));
        assert_eq!(model.bounds.max, Vec3::splat(0.5));
    }
}
