//! Model load lifecycle
//!
//! The engine loads the gallery model asynchronously and reports what
//! happened as [`LoadEvent`]s. [`ModelLoad`] folds those into a single
//! phase the tick loop can check.

use tracing::{error, info, warn};

/// Something the asset loader reported about the model
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// Fraction of the model loaded so far, in `0.0..=1.0`
    Progress(f32),
    /// The scene is available; `has_camera` tells whether it embeds one
    Loaded { has_camera: bool },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadPhase {
    #[default]
    Pending,
    Loading { fraction: f32 },
    Ready,
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct ModelLoad {
    path: String,
    phase: LoadPhase,
}

impl ModelLoad {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            phase: LoadPhase::Pending,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, LoadPhase::Ready)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.phase, LoadPhase::Ready | LoadPhase::Failed { .. })
    }

    /// Fold one loader event into the phase.
    ///
    /// Returns `true` when the phase changed. Events arriving after the load
    /// settled are ignored.
    pub fn apply(&mut self, event: LoadEvent) -> bool {
        if self.is_settled() {
            warn!(path = %self.path, ?event, "Ignoring load event after model settled");
            return false;
        }

        let next = match event {
            LoadEvent::Progress(fraction) => {
                let fraction = fraction.clamp(0.0, 1.0);
                if let LoadPhase::Loading { fraction: current } = self.phase {
                    if fraction <= current {
                        return false;
                    }
                }
                info!(path = %self.path, "{:.0}% loaded", fraction * 100.0);
                LoadPhase::Loading { fraction }
            }
            LoadEvent::Loaded { has_camera } => {
                info!(path = %self.path, has_camera, "Model loaded");
                LoadPhase::Ready
            }
            LoadEvent::Failed(reason) => {
                error!(path = %self.path, %reason, "An error happened while loading the model");
                LoadPhase::Failed { reason }
            }
        };

        self.phase = next;
        true
    }
}
