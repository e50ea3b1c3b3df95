//! Gallery Scene - Bevy plugins for the first-person gallery viewer
//!
//! This crate wires the engine-free logic in `gallery-core` into Bevy:
//! model loading and frame placement, the per-tick camera loop backed by
//! mesh ray casts, lighting, and the egui panels.

pub mod camera;
pub mod models;
pub mod raycast;
pub mod scene;
pub mod types;
pub mod ui;

use bevy::prelude::*;
use gallery_core::Viewer;

/// Plugin that sets up the gallery around a configured [`Viewer`]
pub struct GalleryScenePlugin {
    pub viewer: Viewer,
}

impl GalleryScenePlugin {
    pub fn new(viewer: Viewer) -> Self {
        Self { viewer }
    }
}

impl Plugin for GalleryScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalleryViewer(self.viewer.clone()))
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(ui::UiPlugin);
    }
}

// Re-export commonly used types
pub use types::*;
