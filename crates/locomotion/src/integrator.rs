use artwalk_common::{CameraRig, Heading};
use artwalk_input::MovementInput;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tuning constants for the rig physics.
///
/// Units are chosen so an eye height of 10 feels natural: gravity is the
/// product of g and the rig mass, thrust and the jump impulse are raw
/// velocity deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocomotionConfig {
    /// Exponential horizontal damping coefficient.
    pub friction: f32,
    /// Constant downward acceleration (g times rig mass).
    pub gravity: f32,
    /// Horizontal acceleration while a direction key is held.
    pub thrust: f32,
    /// Instantaneous upward velocity added on jump.
    pub jump_impulse: f32,
    /// Height of the camera above the rig's feet; also the hard floor.
    pub eye_height: f32,
    /// Max range of the downward ground probe, cast from the feet.
    pub ground_ray_range: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            friction: 10.0,
            gravity: 980.0,
            thrust: 400.0,
            jump_impulse: 350.0,
            eye_height: 10.0,
            ground_ray_range: 10.0,
        }
    }
}

/// Downward visibility query against the scene's solid objects.
///
/// Implemented by the scene's collision set; the integrator only consumes
/// whether anything was hit.
pub trait GroundProbe {
    /// True when a ray cast straight down from `origin` hits a solid object
    /// within `max_distance`.
    fn grounded(&self, origin: Vec3, max_distance: f32) -> bool;
}

/// Probe that never reports ground. Covers the window before any model has
/// loaded, when the collision set is empty; the floor clamp still holds the
/// rig up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGround;

impl GroundProbe for NoGround {
    fn grounded(&self, _origin: Vec3, _max_distance: f32) -> bool {
        false
    }
}

/// Per-frame velocity/position integrator for the camera rig.
///
/// Holds the jump-arming latch across frames; everything else is read from
/// and written back to the [`CameraRig`] each step.
#[derive(Debug, Clone)]
pub struct Integrator {
    config: LocomotionConfig,
    can_jump: bool,
}

impl Integrator {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            can_jump: false,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Whether the rig is currently allowed to jump.
    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    /// Advance the rig by `dt` seconds.
    ///
    /// Order matters: damping and gravity first, then thrust, then the
    /// ground probe, then translation, then the unconditional floor clamp,
    /// and the jump impulse last. The floor clamp is authoritative — the
    /// probe only arms the jump and stops downward velocity.
    pub fn step(
        &mut self,
        rig: &mut CameraRig,
        heading: Heading,
        input: &mut MovementInput,
        probe: &dyn GroundProbe,
        dt: f32,
    ) {
        let cfg = self.config;
        let dt = dt.max(0.0);

        rig.velocity.x -= rig.velocity.x * cfg.friction * dt;
        rig.velocity.z -= rig.velocity.z * cfg.friction * dt;
        rig.velocity.y -= cfg.gravity * dt;

        // Normalized intent keeps diagonal movement at axis-aligned speed.
        let intent = Vec3::new(
            (input.right as i32 - input.left as i32) as f32,
            0.0,
            (input.forward as i32 - input.backward as i32) as f32,
        );
        let direction = intent.normalize_or_zero();

        if input.forward || input.backward {
            rig.velocity.z -= direction.z * cfg.thrust * dt;
        }
        if input.left || input.right {
            rig.velocity.x -= direction.x * cfg.thrust * dt;
        }

        let feet = rig.position - Vec3::Y * cfg.eye_height;
        if probe.grounded(feet, cfg.ground_ray_range) {
            rig.velocity.y = rig.velocity.y.max(0.0);
            self.can_jump = true;
        }

        // Camera-relative translation: positive velocity pushes the rig
        // backward/left, so both axes are negated.
        let planar = heading.right() * (-rig.velocity.x * dt)
            + heading.forward() * (-rig.velocity.z * dt);
        rig.position += Vec3::new(planar.x, 0.0, planar.z);
        rig.position.y += rig.velocity.y * dt;

        if rig.position.y < cfg.eye_height {
            rig.velocity.y = 0.0;
            rig.position.y = cfg.eye_height;
            self.can_jump = true;
        }

        if input.take_jump() && self.can_jump {
            rig.velocity.y += cfg.jump_impulse;
            self.can_jump = false;
            tracing::trace!(vy = rig.velocity.y, "jump");
        }

        debug_assert!(rig.position.y >= cfg.eye_height);
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(LocomotionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artwalk_input::Key;

    struct AlwaysGround;
    impl GroundProbe for AlwaysGround {
        fn grounded(&self, _origin: Vec3, _max_distance: f32) -> bool {
            true
        }
    }

    fn rig() -> CameraRig {
        CameraRig::default()
    }

    #[test]
    fn horizontal_velocity_decays_to_zero_under_no_input() {
        let mut integrator = Integrator::default();
        let mut rig = rig();
        rig.velocity.x = 50.0;
        rig.velocity.z = -30.0;
        let mut input = MovementInput::default();

        let mut prev = rig.velocity.x.abs() + rig.velocity.z.abs();
        for _ in 0..60 {
            integrator.step(&mut rig, Heading::default(), &mut input, &AlwaysGround, 0.016);
            let mag = rig.velocity.x.abs() + rig.velocity.z.abs();
            assert!(mag < prev, "horizontal speed must strictly decay");
            prev = mag;
        }
        assert!(prev < 1.0);
    }

    #[test]
    fn forward_input_produces_negative_z_velocity_only() {
        let mut integrator = Integrator::default();
        let mut rig = rig();
        let mut input = MovementInput {
            forward: true,
            ..Default::default()
        };

        integrator.step(&mut rig, Heading::default(), &mut input, &AlwaysGround, 0.1);
        assert!(rig.velocity.z < 0.0, "forward thrust is negative z");
        assert_eq!(rig.velocity.x, 0.0);
    }

    #[test]
    fn diagonal_is_not_faster_than_axis_aligned() {
        let cfg = LocomotionConfig::default();
        let mut straight = Integrator::new(cfg);
        let mut diagonal = Integrator::new(cfg);
        let mut rig_s = rig();
        let mut rig_d = rig();
        let mut input_s = MovementInput {
            forward: true,
            ..Default::default()
        };
        let mut input_d = MovementInput {
            forward: true,
            right: true,
            ..Default::default()
        };

        straight.step(&mut rig_s, Heading::default(), &mut input_s, &AlwaysGround, 0.1);
        diagonal.step(&mut rig_d, Heading::default(), &mut input_d, &AlwaysGround, 0.1);

        let speed_s = (rig_s.velocity.x.powi(2) + rig_s.velocity.z.powi(2)).sqrt();
        let speed_d = (rig_d.velocity.x.powi(2) + rig_d.velocity.z.powi(2)).sqrt();
        assert!((speed_s - speed_d).abs() < 1e-3);
    }

    #[test]
    fn floor_clamp_holds_regardless_of_fall_speed() {
        let mut integrator = Integrator::default();
        let mut rig = rig();
        rig.position.y = 500.0;
        rig.velocity.y = -100_000.0;
        let mut input = MovementInput::default();

        integrator.step(&mut rig, Heading::default(), &mut input, &NoGround, 0.1);
        assert_eq!(rig.position.y, 10.0);
        assert_eq!(rig.velocity.y, 0.0);
    }

    #[test]
    fn floor_clamp_holds_without_any_ground_probe_hit() {
        // Models may not have loaded yet; the clamp alone keeps the rig up.
        let mut integrator = Integrator::default();
        let mut rig = rig();
        let mut input = MovementInput::default();
        for _ in 0..100 {
            integrator.step(&mut rig, Heading::default(), &mut input, &NoGround, 0.016);
            assert!(rig.position.y >= 10.0);
        }
    }

    #[test]
    fn jump_applies_exactly_once_per_grounding() {
        let mut integrator = Integrator::default();
        let mut rig = rig();
        let mut input = MovementInput::default();

        // Land once to arm the jump.
        integrator.step(&mut rig, Heading::default(), &mut input, &NoGround, 0.016);
        assert!(integrator.can_jump());

        input.apply(Key::Space, true);
        integrator.step(&mut rig, Heading::default(), &mut input, &NoGround, 0.001);
        let vy_after_first = rig.velocity.y;
        assert!(vy_after_first > 0.0, "first press jumps");

        // Second press while airborne is a no-op beyond gravity.
        input.apply(Key::Space, true);
        integrator.step(&mut rig, Heading::default(), &mut input, &NoGround, 0.001);
        let expected = vy_after_first - 980.0 * 0.001;
        assert!(
            (rig.velocity.y - expected).abs() < 1e-3,
            "second press must not add impulse: {} vs {}",
            rig.velocity.y,
            expected
        );
    }

    #[test]
    fn ground_probe_zeroes_downward_velocity_and_arms_jump() {
        let mut integrator = Integrator::default();
        let mut rig = rig();
        rig.position.y = 50.0;
        rig.velocity.y = -200.0;
        let mut input = MovementInput::default();

        integrator.step(&mut rig, Heading::default(), &mut input, &AlwaysGround, 0.016);
        assert!(rig.velocity.y >= 0.0);
        assert!(integrator.can_jump());
    }

    #[test]
    fn negative_dt_is_inert() {
        let mut integrator = Integrator::default();
        let mut rig = rig();
        rig.velocity = Vec3::new(5.0, 0.0, -5.0);
        let before = rig;
        let mut input = MovementInput::default();

        integrator.step(&mut rig, Heading::default(), &mut input, &NoGround, -1.0);
        assert_eq!(rig, before);
    }

    #[test]
    fn translation_follows_heading() {
        let mut integrator = Integrator::default();
        let mut rig = rig();
        let mut input = MovementInput {
            forward: true,
            ..Default::default()
        };
        // Facing -Z: forward motion decreases z.
        for _ in 0..10 {
            integrator.step(&mut rig, Heading::default(), &mut input, &AlwaysGround, 0.016);
        }
        assert!(rig.position.z < 0.0);
        assert!(rig.position.x.abs() < 1e-4);

        // Quarter turn: the same input moves along x instead.
        let mut rig2 = CameraRig::default();
        let quarter = Heading {
            yaw: std::f32::consts::FRAC_PI_2,
        };
        let mut integrator2 = Integrator::default();
        for _ in 0..10 {
            integrator2.step(&mut rig2, quarter, &mut input, &AlwaysGround, 0.016);
        }
        assert!(rig2.position.x < 0.0);
        assert!(rig2.position.z.abs() < 1e-3);
    }
}
