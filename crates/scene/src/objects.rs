use artwalk_common::{Aabb, SceneObjectId};
use artwalk_locomotion::GroundProbe;
use glam::Vec3;

use crate::config::ModelPlacement;
use crate::loader::LoadedModel;

/// A placed solid the ground probe can hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: SceneObjectId,
    pub name: String,
    /// World-space collision box.
    pub bounds: Aabb,
}

impl SceneObject {
    /// World-space object for a loaded model at its placement. Collision
    /// uses the scaled, translated local bounds; placement rotation is
    /// ignored, the box stays axis-aligned.
    pub fn from_loaded(model: &LoadedModel, placement: &ModelPlacement) -> Self {
        let min = model.bounds.min * placement.scale + placement.position;
        let max = model.bounds.max * placement.scale + placement.position;
        Self {
            id: SceneObjectId::new(),
            name: model.name.clone(),
            bounds: Aabb::new(min.min(max), min.max(max)),
        }
    }
}

/// The collision set: every solid registered so far this session.
#[derive(Debug, Clone, Default)]
pub struct SceneObjectSet {
    objects: Vec<SceneObject>,
}

impl SceneObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: SceneObject) -> SceneObjectId {
        let id = object.id;
        self.objects.push(object);
        id
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// All objects hit by a straight-down ray from `origin`, nearest first.
    pub fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Vec<(SceneObjectId, f32)> {
        let mut hits: Vec<(SceneObjectId, f32)> = self
            .objects
            .iter()
            .filter_map(|o| {
                o.bounds
                    .ray_intersect(origin, Vec3::NEG_Y, max_distance)
                    .map(|t| (o.id, t))
            })
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }
}

impl GroundProbe for SceneObjectSet {
    fn grounded(&self, origin: Vec3, max_distance: f32) -> bool {
        !self.raycast_down(origin, max_distance).is_empty()
    }
}
