//! Bevy application setup

use bevy::prelude::*;
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};
use gallery_core::Viewer;
use gallery_scene::GalleryScenePlugin;

/// Run the gallery around a configured viewer. Blocks until the window closes.
pub fn run(viewer: Viewer) {
    tracing::info!(model = %viewer.config().model.path, "Starting gallery viewer");

    App::new()
        // The camera loop ticks every frame, so render continuously
        .insert_resource(WinitSettings::game())
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Gallery Walk".to_string(),
                        canvas: Some("#gallery-canvas".to_string()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Model and image paths are relative to the served root
                    file_path: "".to_string(),
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // Picking must be registered before EguiPlugin; mesh picking backs the ray casts
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .add_plugins(GalleryScenePlugin::new(viewer))
        .run();
}
