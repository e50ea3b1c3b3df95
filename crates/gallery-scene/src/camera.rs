//! First-person camera loop
//!
//! Runs once per frame in `Update`: gather input, then let the viewer tick
//! (rig, collision push-back, height pin, forward-ray frame detection) and
//! copy the resulting pose onto the camera transform. Bevy renders after.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;
use bevy_picking::mesh_picking::ray_cast::MeshRayCast;
use gallery_core::{RigInput, TickOutcome};

use crate::raycast::SceneRayCaster;
use crate::types::{transform_from_pose, GalleryCamera, GalleryViewer, PendingRigInput};

/// Plugin for the camera loop
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingRigInput>()
            .add_systems(Update, (gather_rig_input, advance_gallery).chain())
            .add_systems(Last, log_shutdown);
    }
}

/// Sample keyboard, mouse buttons and pointer position into a `RigInput`
fn gather_rig_input(
    windows: Query<&Window, With<PrimaryWindow>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    mut pending: ResMut<PendingRigInput>,
) {
    // Check if egui wants the input - if so, the camera stands still
    let egui_busy = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input() || ctx.wants_keyboard_input())
        .unwrap_or(false);
    if egui_busy {
        pending.0 = RigInput::default();
        return;
    }

    let pointer = windows
        .single()
        .ok()
        .and_then(|window| {
            window
                .cursor_position()
                .map(|cursor| cursor - window.size() / 2.0)
        })
        .unwrap_or(Vec2::ZERO);

    let held = |keys: &[KeyCode]| keys.iter().any(|key| keyboard.pressed(*key));

    pending.0 = RigInput {
        pointer,
        forward: held(&[KeyCode::KeyW, KeyCode::ArrowUp]) || mouse_button.pressed(MouseButton::Left),
        backward: held(&[KeyCode::KeyS, KeyCode::ArrowDown]) || mouse_button.pressed(MouseButton::Right),
        left: held(&[KeyCode::KeyA, KeyCode::ArrowLeft]),
        right: held(&[KeyCode::KeyD, KeyCode::ArrowRight]),
        up: held(&[KeyCode::KeyR]),
        down: held(&[KeyCode::KeyF]),
    };
}

/// One tick of the proximity loop
fn advance_gallery(
    mut viewer: ResMut<GalleryViewer>,
    pending: Res<PendingRigInput>,
    mut camera_query: Query<&mut Transform, With<GalleryCamera>>,
    mut ray_cast: MeshRayCast,
    names: Query<&Name>,
) {
    // Nothing to do until the model has handed us a camera
    if !viewer.0.has_camera() {
        return;
    }
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };

    let name_of = |entity: Entity| names.get(entity).ok().map(|name| name.as_str().to_string());
    let mut scene = SceneRayCaster::new(&mut ray_cast, name_of);

    match viewer.0.tick(&pending.0, &mut scene) {
        TickOutcome::Idle => {}
        TickOutcome::Advanced(report) => {
            if report.correction != Vec3::ZERO {
                tracing::debug!(correction = ?report.correction, "Camera pushed back from geometry");
            }
            if let Some(pose) = viewer.0.camera_pose() {
                *transform = transform_from_pose(pose);
            }
        }
    }
}

fn log_shutdown(mut exits: MessageReader<AppExit>) {
    if exits.read().next().is_some() {
        tracing::info!("Gallery viewer shutting down");
    }
}
