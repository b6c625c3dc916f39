use artwalk_common::Heading;
use glam::{Mat4, Vec3};

/// First-person mouse-look controller.
///
/// Owns pitch and the projection parameters. Yaw lives in the session's
/// [`Heading`] because locomotion translates relative to it; the controller
/// writes yaw through the mutable reference it is handed each mouse event.
pub struct LookController {
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
}

impl Default for LookController {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
            sensitivity: 0.002,
        }
    }
}

impl LookController {
    /// Apply a relative mouse motion. `dx` turns the heading, `dy` pitches
    /// the view; pitch is clamped short of the poles.
    pub fn rotate(&mut self, heading: &mut Heading, dx: f32, dy: f32) {
        heading.yaw -= dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Full look direction including pitch. Yaw zero faces -Z.
    pub fn look(&self, heading: Heading) -> Vec3 {
        let (sy, cy) = heading.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp).normalize()
    }

    pub fn view_matrix(&self, eye: Vec3, heading: Heading) -> Mat4 {
        Mat4::look_at_rh(eye, eye + self.look(heading), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self, eye: Vec3, heading: Heading) -> Mat4 {
        self.projection_matrix() * self.view_matrix(eye, heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_look_faces_negative_z() {
        let look = LookController::default().look(Heading::default());
        assert!((look - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let mut controller = LookController::default();
        let mut heading = Heading::default();
        controller.rotate(&mut heading, 0.0, -100_000.0);
        assert!(controller.pitch < 90.0_f32.to_radians());
        let look = controller.look(heading);
        assert!(look.y > 0.99, "looking almost straight up");
        assert!(look.is_finite());
    }

    #[test]
    fn horizontal_motion_only_turns_the_heading() {
        let mut controller = LookController::default();
        let mut heading = Heading::default();
        controller.rotate(&mut heading, 50.0, 0.0);
        assert_ne!(heading.yaw, 0.0);
        assert_eq!(controller.pitch, 0.0);
    }

    #[test]
    fn view_projection_is_finite() {
        let controller = LookController::default();
        let vp = controller.view_projection(Vec3::new(0.0, 10.0, 0.0), Heading::default());
        assert!(vp.is_finite());
    }
}
