//! Camera parameter panel model
//!
//! Six numeric fields bound to the camera pose. The GUI draws them from a
//! [`PoseSnapshot`] and writes edits back through [`PanelField::set`].

use std::f32::consts::PI;
use std::ops::RangeInclusive;

use crate::pose::{CameraPose, PoseSnapshot};

/// Granularity of every field
pub const STEP: f32 = 0.01;

const POSITION_LIMIT: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelField {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
}

impl PanelField {
    pub const ALL: [PanelField; 6] = [
        PanelField::PositionX,
        PanelField::PositionY,
        PanelField::PositionZ,
        PanelField::RotationX,
        PanelField::RotationY,
        PanelField::RotationZ,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PanelField::PositionX => "Position X",
            PanelField::PositionY => "Position Y",
            PanelField::PositionZ => "Position Z",
            PanelField::RotationX => "Rotation X",
            PanelField::RotationY => "Rotation Y",
            PanelField::RotationZ => "Rotation Z",
        }
    }

    pub fn is_rotation(self) -> bool {
        matches!(self, PanelField::RotationX | PanelField::RotationY | PanelField::RotationZ)
    }

    pub fn range(self) -> RangeInclusive<f32> {
        if self.is_rotation() {
            -PI..=PI
        } else {
            -POSITION_LIMIT..=POSITION_LIMIT
        }
    }

    pub fn get(self, snapshot: &PoseSnapshot) -> f32 {
        match self {
            PanelField::PositionX => snapshot.position.x,
            PanelField::PositionY => snapshot.position.y,
            PanelField::PositionZ => snapshot.position.z,
            PanelField::RotationX => snapshot.rotation.x,
            PanelField::RotationY => snapshot.rotation.y,
            PanelField::RotationZ => snapshot.rotation.z,
        }
    }

    /// Snap `value` to the step, clamp it to the field range and store it
    pub fn set(self, pose: &mut CameraPose, value: f32) {
        let value = self.constrain(value);
        match self {
            PanelField::PositionX => pose.position.x = value,
            PanelField::PositionY => pose.position.y = value,
            PanelField::PositionZ => pose.position.z = value,
            PanelField::RotationX => pose.rotation.x = value,
            PanelField::RotationY => pose.rotation.y = value,
            PanelField::RotationZ => pose.rotation.z = value,
        }
    }

    pub fn constrain(self, value: f32) -> f32 {
        let range = self.range();
        let snapped = (value / STEP).round() * STEP;
        snapped.clamp(*range.start(), *range.end())
    }
}
