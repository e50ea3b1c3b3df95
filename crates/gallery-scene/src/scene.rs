//! Scene lighting

use bevy::prelude::*;

pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.15)))
            .add_systems(Startup, setup_lighting);
    }
}

fn setup_lighting(mut commands: Commands) {
    // Soft fill so unlit corners of the model are not pitch black
    commands.insert_resource(AmbientLight {
        color: Color::srgb(1.0, 0.98, 0.95),
        brightness: 400.0,
        ..default()
    });

    // Skylight through the ceiling
    commands.spawn((
        DirectionalLight {
            illuminance: 4000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Warm gallery spot from above the centre of the room
    commands.spawn((
        PointLight {
            intensity: 200_000.0,
            range: 30.0,
            shadows_enabled: false,
            color: Color::srgb(1.0, 0.95, 0.9),
            ..default()
        },
        Transform::from_xyz(0.0, 3.5, 0.0),
    ));
}
