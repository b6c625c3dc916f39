use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a collision object in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneObjectId(pub Uuid);

impl SceneObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SceneObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// The walkable camera rig: position plus the velocity the locomotion
/// integrator accumulates. Orientation lives in [`Heading`], owned by the
/// mouse-look controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl CameraRig {
    /// Rig standing at the origin at the given eye height, at rest.
    pub fn at_eye_height(eye_height: f32) -> Self {
        Self {
            position: Vec3::new(0.0, eye_height, 0.0),
            velocity: Vec3::ZERO,
        }
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::at_eye_height(10.0)
    }
}

/// Horizontal facing of the rig. Pitch is a render concern; locomotion only
/// ever translates in the XZ plane, matching pointer-lock move semantics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Heading {
    /// Yaw in radians, counter-clockwise about +Y. Zero faces -Z.
    pub yaw: f32,
}

impl Heading {
    /// Unit forward vector projected onto the XZ plane.
    pub fn forward(&self) -> Vec3 {
        let (s, c) = self.yaw.sin_cos();
        Vec3::new(-s, 0.0, -c)
    }

    /// Unit right vector in the XZ plane.
    pub fn right(&self) -> Vec3 {
        let (s, c) = self.yaw.sin_cos();
        Vec3::new(c, 0.0, -s)
    }
}

/// Axis-aligned bounding box used as the collision shape for loaded models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered at `center` with the given half extents.
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Slab-test ray intersection. Returns the entry distance along the ray,
    /// or None if the ray misses or the hit lies beyond `max_distance`.
    pub fn ray_intersect(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_near = 0.0_f32;
        let mut t_far = max_distance;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }
        Some(t_near)
    }
}

/// Seven-color rainbow palette cycled over blob indices in multi-color mode.
pub const RAINBOW: [[f32; 3]; 7] = [
    [1.0, 0.0, 0.0],
    [1.0, 0.5, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.29, 0.0, 0.51],
    [0.58, 0.0, 0.83],
];
