use crate::config::ModelPlacement;
use crate::loader::{ModelLoader, SceneError};
use crate::objects::SceneObject;

/// Outcome of one queued model load.
#[derive(Debug)]
pub enum LoadEvent {
    Loaded(SceneObject),
    Failed { path: String, error: SceneError },
}

/// Pending model loads, drained once at the start of a frame.
///
/// Loads resolve as one-shot events: a placement is removed from the queue
/// whether it loaded or failed, and a failure never blocks the rest of the
/// queue.
#[derive(Debug, Default)]
pub struct LoadQueue {
    pending: Vec<ModelPlacement>,
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, placement: ModelPlacement) {
        self.pending.push(placement);
    }

    pub fn queue_all(&mut self, placements: impl IntoIterator<Item = ModelPlacement>) {
        self.pending.extend(placements);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Resolve every pending load. Failures are logged and reported as
    /// events; the queue is empty afterwards either way.
    pub fn drain(&mut self, loader: &ModelLoader) -> Vec<LoadEvent> {
        self.pending
            .drain(..)
            .map(|placement| match loader.load(&placement.path) {
                Ok(model) => LoadEvent::Loaded(SceneObject::from_loaded(&model, &placement)),
                Err(error) => {
                    tracing::error!(path = %placement.path, %error, "model load failed");
                    LoadEvent::Failed {
                        path: placement.path,
                        error,
                    }
                }
            })
            .collect()
    }
}
