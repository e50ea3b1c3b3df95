//! Gallery Core - Engine-free logic for the first-person gallery viewer
//!
//! This crate provides everything the viewer does that does not need a
//! renderer:
//! - Configuration loading and validation
//! - Frame placement planning for `FramePoint` markers
//! - The first-person camera rig
//! - The per-tick proximity loop (collision push-back, height pin, and
//!   forward-ray frame detection) over an abstract [`RayCaster`]
//! - The model load state machine and the camera parameter panel model

pub mod config;
pub mod error;
pub mod load;
pub mod marker;
pub mod panel;
pub mod pose;
pub mod proximity;
pub mod raycast;
pub mod rig;
pub mod viewer;

pub use config::{load_config, CameraConfig, CollisionConfig, FramesConfig, GalleryConfig, ModelConfig};
pub use error::GalleryError;
pub use load::{LoadEvent, LoadPhase, ModelLoad};
pub use marker::{plan_frames, FramePlacement, Marker, MARKER_PREFIX};
pub use panel::PanelField;
pub use pose::{CameraPose, PoseSnapshot};
pub use proximity::{ProximityLoop, TickReport, COLLISION_DIRECTIONS};
pub use raycast::{Aabb, BoxScene, RayCaster, RayHit};
pub use rig::{FirstPersonRig, RigInput, RigSettings};
pub use viewer::{TickOutcome, Viewer};
