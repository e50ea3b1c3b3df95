//! Camera pose and the read-only snapshot handed to observers

use glam::{EulerRot, Quat, Vec3};

/// Position plus XYZ Euler orientation of the gallery camera.
///
/// The camera looks down its local -Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Rotation about X, Y, Z in radians, applied in XYZ order
    pub rotation: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

impl CameraPose {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn from_quat(position: Vec3, orientation: Quat) -> Self {
        let (x, y, z) = orientation.to_euler(EulerRot::XYZ);
        Self {
            position,
            rotation: Vec3::new(x, y, z),
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        let (x, y, z) = orientation.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    /// View direction through the centre of the screen
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn pin_height(&mut self, eye_height: f32) {
        self.position.y = eye_height;
    }

    pub fn snapshot(&self) -> PoseSnapshot {
        PoseSnapshot {
            position: self.position,
            rotation: self.rotation,
        }
    }
}

/// Copy of the camera pose taken after collision and height pinning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSnapshot {
    pub position: Vec3,
    pub rotation: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_pose_looks_down_negative_z() {
        let forward = CameraPose::default().forward();
        assert_abs_diff_eq!(forward.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(forward.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(forward.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_yaw_quarter_turn_looks_down_negative_x() {
        let pose = CameraPose::new(Vec3::ZERO, Vec3::new(0.0, FRAC_PI_2, 0.0));
        let forward = pose.forward();
        assert_abs_diff_eq!(forward.x, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(forward.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_quat_round_trip_preserves_direction() {
        let orientation = Quat::from_euler(EulerRot::YXZ, 0.7, -0.2, 0.0);
        let pose = CameraPose::from_quat(Vec3::ONE, orientation);
        let expected = orientation * Vec3::NEG_Z;
        let forward = pose.forward();
        assert_abs_diff_eq!(forward.x, expected.x, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.y, expected.y, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn test_pin_height_only_touches_y() {
        let mut pose = CameraPose::new(Vec3::new(3.0, 7.5, -2.0), Vec3::new(0.1, 0.2, 0.3));
        pose.pin_height(1.6);
        assert_eq!(pose.position, Vec3::new(3.0, 1.6, -2.0));
        assert_eq!(pose.rotation, Vec3::new(0.1, 0.2, 0.3));
    }
}
