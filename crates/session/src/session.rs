use artwalk_common::{CameraRig, Heading};
use artwalk_field::{FieldAnimator, Triangulator};
use artwalk_input::{MovementInput, PointerLockState};
use artwalk_locomotion::Integrator;
use artwalk_scene::{LoadEvent, LoadQueue, ModelLoader, SceneConfig, SceneObjectSet};

/// All mutable state of one walkthrough session.
///
/// The windowed app and the headless CLI both drive this through
/// [`frame`](Session::frame); neither owns any simulation state of its own.
pub struct Session {
    config: SceneConfig,
    rig: CameraRig,
    heading: Heading,
    input: MovementInput,
    pointer_lock: PointerLockState,
    integrator: Integrator,
    animator: FieldAnimator,
    objects: SceneObjectSet,
    loads: LoadQueue,
    loader: ModelLoader,
    frame: u64,
}

impl Session {
    /// New session with every configured model queued for loading.
    pub fn new(config: SceneConfig) -> Self {
        let mut loads = LoadQueue::new();
        loads.queue_all(config.models.iter().cloned());
        let animator = FieldAnimator::new(config.field);
        Self {
            config,
            rig: CameraRig::default(),
            heading: Heading::default(),
            input: MovementInput::default(),
            pointer_lock: PointerLockState::default(),
            integrator: Integrator::default(),
            animator,
            objects: SceneObjectSet::new(),
            loads,
            loader: ModelLoader::new(),
            frame: 0,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn heading_mut(&mut self) -> &mut Heading {
        &mut self.heading
    }

    pub fn input_mut(&mut self) -> &mut MovementInput {
        &mut self.input
    }

    pub fn pointer_lock(&self) -> &PointerLockState {
        &self.pointer_lock
    }

    pub fn pointer_lock_mut(&mut self) -> &mut PointerLockState {
        &mut self.pointer_lock
    }

    pub fn animator(&self) -> &FieldAnimator {
        &self.animator
    }

    pub fn objects(&self) -> &SceneObjectSet {
        &self.objects
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Advance the session by one frame.
    ///
    /// Order is fixed: resolve pending loads first so freshly loaded solids
    /// are probeable this frame, then integrate locomotion (only while
    /// pointer lock is held), then animate and triangulate the field.
    pub fn frame(&mut self, dt: f32, triangulator: &mut dyn Triangulator) {
        for event in self.loads.drain(&self.loader) {
            match event {
                LoadEvent::Loaded(object) => {
                    tracing::info!(name = %object.name, "solid registered");
                    self.objects.insert(object);
                }
                // Already logged by the queue; the walkthrough continues
                // without this model.
                LoadEvent::Failed { .. } => {}
            }
        }

        if self.pointer_lock.is_locked() {
            self.integrator.step(
                &mut self.rig,
                self.heading,
                &mut self.input,
                &self.objects,
                dt,
            );
        }

        self.animator.update(dt, triangulator);
        self.frame += 1;
    }

    /// Deterministic hash of the replay-relevant state, for comparing two
    /// runs of the same input sequence.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&self.frame.to_le_bytes());
        for c in [
            self.rig.position.x,
            self.rig.position.y,
            self.rig.position.z,
            self.rig.velocity.x,
            self.rig.velocity.y,
            self.rig.velocity.z,
            self.heading.yaw,
            self.animator.time(),
        ] {
            mix(&c.to_le_bytes());
        }
        mix(&(self.objects.len() as u64).to_le_bytes());
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artwalk_field::NullTriangulator;
    use artwalk_input::Key;
    use std::io::Write;

    fn empty_scene() -> SceneConfig {
        SceneConfig {
            models: Vec::new(),
            planes: Vec::new(),
            ..SceneConfig::default()
        }
    }

    #[test]
    fn locomotion_freezes_while_unlocked() {
        let mut session = Session::new(empty_scene());
        let mut tri = NullTriangulator::default();
        session.input_mut().apply(Key::KeyW, true);

        for _ in 0..30 {
            session.frame(0.016, &mut tri);
        }
        assert_eq!(session.rig().position, CameraRig::default().position);

        session.pointer_lock_mut().lock();
        for _ in 0..30 {
            session.frame(0.016, &mut tri);
        }
        assert!(session.rig().position.z < 0.0, "locked input moves the rig");
    }

    #[test]
    fn field_animates_even_while_unlocked() {
        let mut session = Session::new(empty_scene());
        let mut tri = NullTriangulator::default();
        session.frame(0.016, &mut tri);
        assert!(session.animator().is_running());
        assert!(session.animator().time() > 0.0);
    }

    #[test]
    fn frame_counter_advances() {
        let mut session = Session::new(empty_scene());
        let mut tri = NullTriangulator::default();
        for _ in 0..5 {
            session.frame(0.016, &mut tri);
        }
        assert_eq!(session.frame_count(), 5);
    }

    #[test]
    fn queued_models_register_on_the_first_frame() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(
            br#"{
                "asset": {"version": "2.0"},
                "meshes": [{"name": "blob"}],
                "accessors": [{
                    "type": "VEC3", "componentType": 5126, "count": 3,
                    "min": [-1.0, -1.0, -1.0], "max": [1.0, 1.0, 1.0]
                }]
            }"#,
        )
        .unwrap();

        let mut config = empty_scene();
        config.models.push(artwalk_scene::ModelPlacement::new(
            tmp.path().to_str().unwrap(),
            glam::Vec3::ZERO,
            glam::Vec3::ZERO,
            1.0,
        ));
        let mut session = Session::new(config);
        assert!(session.objects().is_empty());

        session.frame(0.016, &mut NullTriangulator::default());
        assert_eq!(session.objects().len(), 1);
    }

    #[test]
    fn a_missing_model_does_not_stop_the_session() {
        let mut config = empty_scene();
        config.models.push(artwalk_scene::ModelPlacement::new(
            "missing/blob.glb",
            glam::Vec3::ZERO,
            glam::Vec3::ZERO,
            1.0,
        ));
        let mut session = Session::new(config);
        let mut tri = NullTriangulator::default();
        for _ in 0..3 {
            session.frame(0.016, &mut tri);
        }
        assert!(session.objects().is_empty());
        assert_eq!(session.frame_count(), 3);
    }

    #[test]
    fn identical_input_sequences_hash_identically() {
        let mut a = Session::new(empty_scene());
        let mut b = Session::new(empty_scene());
        let mut tri = NullTriangulator::default();

        for session in [&mut a, &mut b] {
            session.pointer_lock_mut().lock();
            session.input_mut().apply(Key::KeyW, true);
            for _ in 0..60 {
                session.frame(0.016, &mut tri);
            }
        }
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn diverging_input_changes_the_hash() {
        let mut a = Session::new(empty_scene());
        let mut b = Session::new(empty_scene());
        let mut tri = NullTriangulator::default();
        a.pointer_lock_mut().lock();
        b.pointer_lock_mut().lock();
        a.input_mut().apply(Key::KeyW, true);

        for _ in 0..60 {
            a.frame(0.016, &mut tri);
            b.frame(0.016, &mut tri);
        }
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
