//! Shared resources and marker components

use bevy::prelude::*;
use gallery_core::{CameraPose, RigInput, Viewer};

/// The viewer context driven by the tick loop
#[derive(Resource, Debug, Clone)]
pub struct GalleryViewer(pub Viewer);

/// Input gathered this frame, consumed by the camera loop
#[derive(Resource, Debug, Clone, Default)]
pub struct PendingRigInput(pub RigInput);

/// Marker component for the camera the viewer walks with
#[derive(Component)]
pub struct GalleryCamera;

/// Root of the spawned gallery model
#[derive(Component)]
pub struct GalleryModel;

/// Model root still waiting to be moved onto the floor
#[derive(Component)]
pub struct PendingGrounding;

/// A picture frame hung at a marker
#[derive(Component)]
pub struct GalleryFrame;

pub fn pose_from_transform(transform: &Transform) -> CameraPose {
    CameraPose::from_quat(transform.translation, transform.rotation)
}

pub fn transform_from_pose(pose: &CameraPose) -> Transform {
    Transform::from_translation(pose.position).with_rotation(pose.orientation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_transform_round_trip() {
        let transform = Transform::from_xyz(1.0, 1.6, -3.0).looking_to(Vec3::new(1.0, 0.2, -1.0), Vec3::Y);
        let back = transform_from_pose(&pose_from_transform(&transform));

        assert!(back.translation.abs_diff_eq(transform.translation, 1e-5));
        let expected = transform.forward();
        assert!((*back.forward()).abs_diff_eq(*expected, 1e-4));
    }
}
