use artwalk_session::Session;
use glam::Vec3;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl RenderView {
    /// View derived from the rig position and a look direction.
    pub fn from_rig(eye: Vec3, look: Vec3) -> Self {
        Self {
            eye,
            target: eye + look,
            fov_degrees: 75.0,
        }
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_rig(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Z)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads session state and a view configuration, then produces
/// output. It never mutates the session.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given session state and view.
    fn render(&self, session: &Session, view: &RenderView) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable snapshot of the session. Used by the headless
/// CLI and by tests of the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, session: &Session, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Session (frame={}, locked={}) ===\n",
            session.frame_count(),
            session.pointer_lock().is_locked()
        ));
        let rig = session.rig();
        out.push_str(&format!(
            "Rig: pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2}) yaw={:.3}\n",
            rig.position.x,
            rig.position.y,
            rig.position.z,
            rig.velocity.x,
            rig.velocity.y,
            rig.velocity.z,
            session.heading().yaw
        ));
        out.push_str(&format!(
            "Field: time={:.3} running={}\n",
            session.animator().time(),
            session.animator().is_running()
        ));
        out.push_str(&format!("Solids: {}\n", session.objects().len()));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));
        for object in session.objects().iter() {
            out.push_str(&format!(
                "  [{}] {} min=({:.1}, {:.1}, {:.1})\n",
                &object.id.0.to_string()[..8],
                object.name,
                object.bounds.min.x,
                object.bounds.min.y,
                object.bounds.min.z
            ));
        }
        out
    }
}
