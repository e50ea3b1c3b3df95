//! egui overlays: camera parameter panel and active frame indicator

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use gallery_core::panel::STEP;
use gallery_core::PanelField;

use crate::types::GalleryViewer;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, (camera_panel, active_frame_overlay));
    }
}

/// Six drag fields bound to the camera pose.
/// Shows the pose as of the last tick; edits go back through the viewer.
fn camera_panel(mut contexts: EguiContexts, mut viewer: ResMut<GalleryViewer>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let Some(snapshot) = viewer.0.snapshot() else {
        return;
    };

    let mut edits: Vec<(PanelField, f32)> = Vec::new();

    egui::Window::new("Camera")
        .resizable(false)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
        .show(ctx, |ui| {
            egui::Grid::new("camera_fields")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    for field in PanelField::ALL {
                        ui.label(field.label());
                        let mut value = field.get(&snapshot);
                        let response = ui.add(
                            egui::DragValue::new(&mut value)
                                .range(field.range())
                                .speed(STEP)
                                .fixed_decimals(2),
                        );
                        if response.changed() {
                            edits.push((field, value));
                        }
                        ui.end_row();
                    }
                });
        });

    if edits.is_empty() {
        return;
    }
    let Some(mut pose) = viewer.0.camera_pose().copied() else {
        return;
    };
    for (field, value) in edits {
        field.set(&mut pose, value);
    }
    viewer.0.set_camera_pose(pose);
}

/// White box with the active frame name at the top-left
fn active_frame_overlay(mut contexts: EguiContexts, viewer: Res<GalleryViewer>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let Some(name) = viewer.0.active_frame() else {
        return;
    };

    egui::Area::new(egui::Id::new("active_frame"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::WHITE)
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(name).color(egui::Color32::BLACK));
                });
        });
}
