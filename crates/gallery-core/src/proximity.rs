//! Proximity & containment loop
//!
//! Each tick runs, in order: rig update, collision push-back along the four
//! horizontal world axes, height pin, then a forward ray to find the frame
//! being looked at. Rendering happens afterwards in the engine.

use glam::Vec3;
use tracing::debug;

use crate::config::GalleryConfig;
use crate::pose::{CameraPose, PoseSnapshot};
use crate::raycast::RayCaster;
use crate::rig::{FirstPersonRig, RigInput};

/// World-space probe directions for collision push-back.
///
/// These are fixed world axes, not camera-relative.
pub const COLLISION_DIRECTIONS: [Vec3; 4] = [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z];

/// Result of one pass through the loop
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Pose after collision and height pin
    pub snapshot: PoseSnapshot,
    /// Total push-back applied this tick
    pub correction: Vec3,
    pub active_frame: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProximityLoop {
    pub eye_height: f32,
    pub fixed_step: f32,
    pub collision_threshold: f32,
    pub collision_step: f32,
    pub marker_prefix: String,
}

impl Default for ProximityLoop {
    fn default() -> Self {
        Self::from(&GalleryConfig::default())
    }
}

impl From<&GalleryConfig> for ProximityLoop {
    fn from(config: &GalleryConfig) -> Self {
        Self {
            eye_height: config.camera.eye_height,
            fixed_step: config.camera.fixed_step,
            collision_threshold: config.collision.threshold,
            collision_step: config.collision.step,
            marker_prefix: config.frames.marker_prefix.clone(),
        }
    }
}

impl ProximityLoop {
    /// Run steps 1 to 4 of a tick against `scene`
    pub fn tick<R: RayCaster>(&self, rig: &mut FirstPersonRig, input: &RigInput, scene: &mut R) -> TickReport {
        rig.update(self.fixed_step, input);

        let pose = rig.pose_mut();
        let correction = self.correct_collisions(scene, pose);
        pose.pin_height(self.eye_height);

        let active_frame = self.detect_active_frame(scene, pose);

        TickReport {
            snapshot: pose.snapshot(),
            correction,
            active_frame,
        }
    }

    /// Push the camera away from geometry closer than the threshold.
    ///
    /// Directions are resolved one after another, each probing from the
    /// position left by the previous one. Returns the summed displacement.
    pub fn correct_collisions<R: RayCaster>(&self, scene: &mut R, pose: &mut CameraPose) -> Vec3 {
        let start = pose.position;

        for direction in COLLISION_DIRECTIONS {
            let hits = scene.cast(pose.position, direction);
            let Some(nearest) = hits.first() else {
                continue;
            };
            if nearest.distance < self.collision_threshold {
                debug!(
                    ?direction,
                    distance = nearest.distance,
                    hit = nearest.name.as_deref().unwrap_or("<unnamed>"),
                    "Collision push-back"
                );
                pose.position -= direction * self.collision_step;
            }
        }

        pose.position - start
    }

    /// Name of the frame under the screen centre.
    ///
    /// When several marker-named objects lie on the ray the farthest one
    /// wins, matching the established viewer behaviour.
    pub fn detect_active_frame<R: RayCaster>(&self, scene: &mut R, pose: &CameraPose) -> Option<String> {
        let hits = scene.cast(pose.position, pose.forward());
        hits.into_iter()
            .filter(|hit| hit.name_starts_with(&self.marker_prefix))
            .last()
            .and_then(|hit| hit.name)
    }
}
