//! Viewer context: everything the tick loop owns between frames

use tracing::{debug, info};

use crate::config::GalleryConfig;
use crate::error::GalleryError;
use crate::load::{LoadEvent, ModelLoad};
use crate::pose::{CameraPose, PoseSnapshot};
use crate::proximity::{ProximityLoop, TickReport};
use crate::raycast::RayCaster;
use crate::rig::{FirstPersonRig, RigInput, RigSettings};

/// What a call to [`Viewer::tick`] did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No camera yet; nothing was cast and nothing should be drawn
    Idle,
    Advanced(TickReport),
}

impl TickOutcome {
    pub fn should_render(&self) -> bool {
        matches!(self, TickOutcome::Advanced(_))
    }
}

#[derive(Debug, Clone)]
pub struct Viewer {
    config: GalleryConfig,
    load: ModelLoad,
    proximity: ProximityLoop,
    rig: Option<FirstPersonRig>,
    active_frame: Option<String>,
    snapshot: Option<PoseSnapshot>,
}

impl Viewer {
    pub fn new(config: GalleryConfig) -> Result<Self, GalleryError> {
        config.validate()?;
        Ok(Self {
            load: ModelLoad::new(config.model.path.clone()),
            proximity: ProximityLoop::from(&config),
            config,
            rig: None,
            active_frame: None,
            snapshot: None,
        })
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn load(&self) -> &ModelLoad {
        &self.load
    }

    pub fn on_load_event(&mut self, event: LoadEvent) -> bool {
        self.load.apply(event)
    }

    /// Take over a camera once the model provides one (or a fallback is
    /// placed). The camera starts at eye height.
    pub fn install_camera(&mut self, mut pose: CameraPose) {
        pose.pin_height(self.config.camera.eye_height);
        info!(position = ?pose.position, "Gallery camera installed");
        self.rig = Some(FirstPersonRig::new(pose, RigSettings::from(&self.config.camera)));
        self.snapshot = Some(pose.snapshot());
    }

    pub fn has_camera(&self) -> bool {
        self.rig.is_some()
    }

    pub fn camera_pose(&self) -> Option<&CameraPose> {
        self.rig.as_ref().map(FirstPersonRig::pose)
    }

    /// Apply a pose edited outside the loop; ignored until a camera exists
    pub fn set_camera_pose(&mut self, pose: CameraPose) {
        if let Some(rig) = self.rig.as_mut() {
            rig.set_pose(pose);
        }
    }

    pub fn active_frame(&self) -> Option<&str> {
        self.active_frame.as_deref()
    }

    /// Pose as of the end of the last tick, for passive observers
    pub fn snapshot(&self) -> Option<PoseSnapshot> {
        self.snapshot
    }

    pub fn tick<R: RayCaster>(&mut self, input: &RigInput, scene: &mut R) -> TickOutcome {
        let Some(rig) = self.rig.as_mut() else {
            return TickOutcome::Idle;
        };

        let report = self.proximity.tick(rig, input, scene);
        if report.active_frame != self.active_frame {
            debug!(active_frame = ?report.active_frame, "Active frame changed");
        }
        self.active_frame = report.active_frame.clone();
        self.snapshot = Some(report.snapshot);
        TickOutcome::Advanced(report)
    }
}
