//! First-person camera rig
//!
//! Look direction is steered by how far the pointer sits from the viewport
//! centre: the further out, the faster the view turns. Movement keys
//! translate along the camera's local axes. The rig does not know about eye
//! height; the proximity loop pins it afterwards.

use glam::{EulerRot, Quat, Vec2, Vec3};
use std::f32::consts::PI;

use crate::config::CameraConfig;
use crate::pose::CameraPose;

/// Latitude clamp in degrees
const MAX_LATITUDE: f32 = 85.0;

/// Rig tuning, usually taken from [`CameraConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct RigSettings {
    pub look_speed: f32,
    pub movement_speed: f32,
    pub look_vertical: bool,
    pub constrain_vertical: bool,
    pub vertical_min: f32,
    pub vertical_max: f32,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}

impl From<&CameraConfig> for RigSettings {
    fn from(config: &CameraConfig) -> Self {
        Self {
            look_speed: config.look_speed,
            movement_speed: config.movement_speed,
            look_vertical: config.look_vertical,
            constrain_vertical: config.constrain_vertical,
            vertical_min: config.vertical_min,
            vertical_max: config.vertical_max,
        }
    }
}

/// Input buffered since the previous tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RigInput {
    /// Pointer offset from the viewport centre in pixels, +Y pointing down
    pub pointer: Vec2,
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Debug, Clone)]
pub struct FirstPersonRig {
    pose: CameraPose,
    settings: RigSettings,
    /// Degrees above the horizon
    lat: f32,
    /// Degrees around +Y, measured from +Z
    lon: f32,
}

impl FirstPersonRig {
    pub fn new(pose: CameraPose, settings: RigSettings) -> Self {
        let mut rig = Self {
            pose,
            settings,
            lat: 0.0,
            lon: 0.0,
        };
        rig.orient_from_pose();
        rig
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn pose_mut(&mut self) -> &mut CameraPose {
        &mut self.pose
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    /// Replace the pose from outside (panel edits, engine transforms).
    ///
    /// A changed orientation re-seeds the look angles so the next update
    /// continues from it instead of snapping back.
    pub fn set_pose(&mut self, pose: CameraPose) {
        let reorient = pose.rotation != self.pose.rotation;
        self.pose = pose;
        if reorient {
            self.orient_from_pose();
        }
    }

    /// Apply buffered look and move input for a step of `dt`
    pub fn update(&mut self, dt: f32, input: &RigInput) {
        let distance = dt * self.settings.movement_speed;
        let orientation = self.pose.orientation();

        let mut local = Vec3::ZERO;
        if input.forward {
            local.z -= distance;
        }
        if input.backward {
            local.z += distance;
        }
        if input.left {
            local.x -= distance;
        }
        if input.right {
            local.x += distance;
        }
        if input.up {
            local.y += distance;
        }
        if input.down {
            local.y -= distance;
        }
        self.pose.position += orientation * local;

        let look = dt * self.settings.look_speed;
        let vertical_ratio = if self.settings.constrain_vertical {
            PI / (self.settings.vertical_max - self.settings.vertical_min)
        } else {
            1.0
        };

        self.lon -= input.pointer.x * look;
        if self.settings.look_vertical {
            self.lat -= input.pointer.y * look * vertical_ratio;
        }
        self.lat = self.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);

        let mut phi = (90.0 - self.lat).to_radians();
        let theta = self.lon.to_radians();
        if self.settings.constrain_vertical {
            phi = map_linear(phi, 0.0, PI, self.settings.vertical_min, self.settings.vertical_max);
        }

        let direction = Vec3::new(phi.sin() * theta.sin(), phi.cos(), phi.sin() * theta.cos());
        self.pose.set_orientation(look_rotation(direction));
    }

    fn orient_from_pose(&mut self) {
        let direction = self.pose.forward().normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }
        let phi = direction.y.clamp(-1.0, 1.0).acos();
        let theta = direction.x.atan2(direction.z);
        self.lat = 90.0 - phi.to_degrees();
        self.lon = theta.to_degrees();
    }
}

fn map_linear(x: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}

/// Orientation whose -Z axis points along `direction`, with no roll
fn look_rotation(direction: Vec3) -> Quat {
    let yaw = (-direction.x).atan2(-direction.z);
    let pitch = direction.y.clamp(-1.0, 1.0).asin();
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}
