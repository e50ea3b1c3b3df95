//! glTF gallery model loading, frame placement and grounding

use bevy::asset::{LoadState, RecursiveDependencyLoadState};
use bevy::camera::primitives::Aabb;
use bevy::ecs::system::SystemParam;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;
use gallery_core::{plan_frames, Aabb as Bounds, FramePlacement, FramesConfig, LoadEvent, Marker};
use std::f32::consts::PI;

use crate::types::{
    pose_from_transform, transform_from_pose, GalleryCamera, GalleryFrame, GalleryModel, GalleryViewer,
    PendingGrounding,
};

/// Gap between the frame body and each picture face
const FACE_GAP: f32 = 0.001;

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, start_model_load)
            .add_systems(Update, track_model_load)
            .add_systems(Update, ground_model.after(track_model_load))
            .add_observer(on_model_ready);
    }
}

/// Handle of the gallery model while it loads
#[derive(Resource)]
pub struct ModelAsset {
    pub handle: Handle<Gltf>,
    pub spawned: bool,
}

fn start_model_load(mut commands: Commands, asset_server: Res<AssetServer>, viewer: Res<GalleryViewer>) {
    let path = viewer.0.load().path().to_string();
    tracing::info!("Starting to load gallery model: {}", path);
    let handle: Handle<Gltf> = asset_server.load(path);
    commands.insert_resource(ModelAsset { handle, spawned: false });
}

/// What the model's load states call for
#[derive(Debug, PartialEq)]
pub enum LoadStep {
    Wait,
    Report(LoadEvent),
    /// The model and everything it references is in
    Spawn,
}

pub fn load_step(state: &LoadState, recursive: &RecursiveDependencyLoadState) -> LoadStep {
    match (state, recursive) {
        (LoadState::Failed(err), _) | (_, RecursiveDependencyLoadState::Failed(err)) => {
            LoadStep::Report(LoadEvent::Failed(err.to_string()))
        }
        (LoadState::Loaded, RecursiveDependencyLoadState::Loaded) => LoadStep::Spawn,
        // Model file parsed, textures and buffers still arriving
        (LoadState::Loaded, _) => LoadStep::Report(LoadEvent::Progress(0.5)),
        (LoadState::Loading, _) => LoadStep::Report(LoadEvent::Progress(0.0)),
        _ => LoadStep::Wait,
    }
}

/// Poll the asset server and feed load events to the viewer.
/// Spawns the scene once the model and everything it references is loaded.
fn track_model_load(
    mut commands: Commands,
    model: Option<ResMut<ModelAsset>>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    mut viewer: ResMut<GalleryViewer>,
) {
    let Some(mut model) = model else {
        return;
    };
    if model.spawned || viewer.0.load().is_settled() {
        return;
    }
    let Some((state, _, recursive)) = asset_server.get_load_states(model.handle.id()) else {
        return;
    };

    match load_step(&state, &recursive) {
        LoadStep::Wait => {}
        LoadStep::Report(event) => {
            viewer.0.on_load_event(event);
        }
        LoadStep::Spawn => {
            let Some(gltf) = gltf_assets.get(&model.handle) else {
                return;
            };
            // Use first scene if no default
            let Some(scene) = gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()) else {
                viewer
                    .0
                    .on_load_event(LoadEvent::Failed("model contains no scenes".to_string()));
                return;
            };

            viewer.0.on_load_event(LoadEvent::Progress(1.0));
            commands.spawn((
                SceneRoot(scene),
                Transform::default(),
                GalleryModel,
                Name::new("GalleryModel"),
            ));
            model.spawned = true;
        }
    }
}

/// Named nodes and the first embedded camera found under a model root
#[derive(Debug, Default)]
pub struct ModelNodes {
    /// Every named node, depth-first in authored order, with its transform
    /// relative to the model root
    pub named: Vec<Marker>,
    pub camera: Option<(Entity, Transform)>,
}

/// Walk the model depth-first, composing transforms down from the root
pub fn collect_model_nodes(
    root: Entity,
    children_query: &Query<&Children>,
    node_query: &Query<(&Transform, Option<&Name>, Has<Camera3d>)>,
) -> ModelNodes {
    fn visit(
        entity: Entity,
        parent: &Transform,
        children_query: &Query<&Children>,
        node_query: &Query<(&Transform, Option<&Name>, Has<Camera3d>)>,
        found: &mut ModelNodes,
    ) {
        let Ok(children) = children_query.get(entity) else {
            return;
        };
        for child in children.iter() {
            let Ok((local, name, is_camera)) = node_query.get(child) else {
                continue;
            };
            let composed = parent.mul_transform(*local);

            if let Some(name) = name {
                found
                    .named
                    .push(Marker::new(name.as_str(), composed.translation, composed.rotation));
            }
            if is_camera && found.camera.is_none() {
                found.camera = Some((child, composed));
            }

            visit(child, &composed, children_query, node_query, found);
        }
    }

    let mut found = ModelNodes::default();
    visit(root, &Transform::IDENTITY, children_query, node_query, &mut found);
    found
}

fn on_model_ready(ready: On<SceneInstanceReady>, mut setup: ModelSetup) {
    setup.prepare(ready.event_target());
}

/// Everything needed to turn an instantiated model into the gallery
#[derive(SystemParam)]
pub struct ModelSetup<'w, 's> {
    commands: Commands<'w, 's>,
    models: Query<'w, 's, (), With<GalleryModel>>,
    children_query: Query<'w, 's, &'static Children>,
    node_query: Query<'w, 's, (&'static Transform, Option<&'static Name>, Has<Camera3d>)>,
    viewer: ResMut<'w, GalleryViewer>,
    asset_server: Res<'w, AssetServer>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
}

impl ModelSetup<'_, '_> {
    /// Adopt the camera, hang the frames, and hand the viewer its load
    /// result. Roots other than the gallery model are ignored.
    pub fn prepare(&mut self, root: Entity) {
        if self.models.get(root).is_err() {
            return;
        }

        let config = self.viewer.0.config().clone();
        let nodes = collect_model_nodes(root, &self.children_query, &self.node_query);

        let has_camera = nodes.camera.is_some();
        let camera = match nodes.camera {
            Some((entity, transform)) => {
                tracing::info!("Using camera embedded in the model");
                // Detach so grounding the model does not drag the camera along
                self.commands.entity(entity).remove::<ChildOf>().insert(GalleryCamera);
                Some((entity, transform))
            }
            None => match config.camera.fallback_position {
                Some([x, y, z]) => {
                    tracing::warn!("Model has no camera, placing one at [{}, {}, {}]", x, y, z);
                    let transform = Transform::from_xyz(x, y, z);
                    let entity = self
                        .commands
                        .spawn((Camera3d::default(), transform, GalleryCamera, Name::new("GalleryCamera")))
                        .id();
                    Some((entity, transform))
                }
                None => {
                    tracing::warn!("Model has no camera and no fallback is configured; viewer stays idle");
                    None
                }
            },
        };

        if let Some((entity, transform)) = camera {
            self.viewer.0.install_camera(pose_from_transform(&transform));
            if let Some(pose) = self.viewer.0.camera_pose() {
                self.commands.entity(entity).insert(transform_from_pose(pose));
            }
        }

        match plan_frames(nodes.named, &config.frames) {
            Ok(placements) => {
                let kit = FrameKit::new(&config.frames, &mut self.meshes, &mut self.materials);
                for placement in &placements {
                    let frame = kit.spawn(&mut self.commands, placement, &self.asset_server, &mut self.materials);
                    self.commands.entity(root).add_child(frame);
                }
                tracing::info!("Placed {} frames", placements.len());
            }
            Err(err) => {
                tracing::error!("Frame placement failed: {}", err);
            }
        }

        self.viewer.0.on_load_event(LoadEvent::Loaded { has_camera });

        if config.model.ground_to_floor {
            self.commands.entity(root).insert(PendingGrounding);
        }
    }
}

/// Meshes and materials shared by every frame
struct FrameKit {
    body: Handle<Mesh>,
    face: Handle<Mesh>,
    sides: Handle<StandardMaterial>,
    face_offset: f32,
}

impl FrameKit {
    fn new(config: &FramesConfig, meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            body: meshes.add(Cuboid::new(config.width, config.height, config.depth)),
            face: meshes.add(Rectangle::new(config.width, config.height)),
            sides: materials.add(StandardMaterial {
                base_color: Color::BLACK,
                unlit: true,
                ..default()
            }),
            face_offset: config.depth / 2.0 + FACE_GAP,
        }
    }

    /// Spawn a frame: black body with the picture on front and back.
    /// Every mesh carries the frame name so ray hits resolve to it.
    fn spawn(
        &self,
        commands: &mut Commands,
        placement: &FramePlacement,
        asset_server: &AssetServer,
        materials: &mut Assets<StandardMaterial>,
    ) -> Entity {
        let picture = materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load(placement.image.clone())),
            unlit: true,
            ..default()
        });
        let name = placement.name.clone();

        commands
            .spawn((
                Name::new(name.clone()),
                GalleryFrame,
                Transform::from_translation(placement.translation).with_rotation(placement.rotation),
                Visibility::default(),
            ))
            .with_children(|frame| {
                frame.spawn((
                    Mesh3d(self.body.clone()),
                    MeshMaterial3d(self.sides.clone()),
                    Name::new(name.clone()),
                ));
                frame.spawn((
                    Mesh3d(self.face.clone()),
                    MeshMaterial3d(picture.clone()),
                    Transform::from_xyz(0.0, 0.0, self.face_offset),
                    Name::new(name.clone()),
                ));
                frame.spawn((
                    Mesh3d(self.face.clone()),
                    MeshMaterial3d(picture),
                    Transform::from_xyz(0.0, 0.0, -self.face_offset).with_rotation(Quat::from_rotation_y(PI)),
                    Name::new(name),
                ));
            })
            .id()
    }
}

/// What a bounds scan of the model found
#[derive(Debug, PartialEq)]
pub enum ModelBounds {
    /// Some mesh has no bounds yet
    Waiting,
    Empty,
    Ready(Bounds),
}

/// World-space bounds of every mesh under `root`, frames excluded
pub fn model_bounds(
    root: Entity,
    children_query: &Query<&Children>,
    frame_query: &Query<(), With<GalleryFrame>>,
    mesh_query: &Query<(Option<&Aabb>, &GlobalTransform), With<Mesh3d>>,
) -> ModelBounds {
    let mut bounds: Option<Bounds> = None;
    let mut stack = vec![root];

    while let Some(entity) = stack.pop() {
        if frame_query.contains(entity) {
            continue;
        }
        if let Ok((aabb, global)) = mesh_query.get(entity) {
            let Some(aabb) = aabb else {
                return ModelBounds::Waiting;
            };
            let center = Vec3::from(aabb.center);
            let half = Vec3::from(aabb.half_extents);
            for sign in [
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(-1.0, -1.0, 1.0),
                Vec3::new(-1.0, 1.0, -1.0),
                Vec3::new(-1.0, 1.0, 1.0),
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(1.0, -1.0, 1.0),
                Vec3::new(1.0, 1.0, -1.0),
                Vec3::new(1.0, 1.0, 1.0),
            ] {
                let corner = global.transform_point(center + half * sign);
                let point = Bounds::new(corner, corner);
                bounds = Some(bounds.map_or(point, |b| b.union(&point)));
            }
        }
        if let Ok(children) = children_query.get(entity) {
            stack.extend(children.iter());
        }
    }

    bounds.map_or(ModelBounds::Empty, ModelBounds::Ready)
}

/// Lift the model so its lowest point rests on Y = 0
fn ground_model(
    mut commands: Commands,
    mut models: Query<(Entity, &mut Transform), (With<GalleryModel>, With<PendingGrounding>)>,
    children_query: Query<&Children>,
    frame_query: Query<(), With<GalleryFrame>>,
    mesh_query: Query<(Option<&Aabb>, &GlobalTransform), With<Mesh3d>>,
) {
    for (root, mut transform) in models.iter_mut() {
        match model_bounds(root, &children_query, &frame_query, &mesh_query) {
            ModelBounds::Waiting => continue,
            ModelBounds::Empty => {
                tracing::debug!("Model has no meshes to ground");
            }
            ModelBounds::Ready(bounds) => {
                let offset = bounds.floor_offset();
                transform.translation += offset;
                tracing::info!("Grounded model, lowest point was y = {:.3}", bounds.min.y);
            }
        }
        commands.entity(root).remove::<PendingGrounding>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raycast::SceneRayCaster;
    use bevy::asset::AssetLoadError;
    use bevy::camera::primitives::MeshAabb;
    use bevy::ecs::system::RunSystemOnce;
    use bevy_picking::mesh_picking::ray_cast::MeshRayCast;
    use gallery_core::{GalleryConfig, RigInput, Viewer};
    use std::sync::Arc;

    fn gallery_app(config: GalleryConfig) -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin::default(),
            bevy::transform::TransformPlugin,
            bevy::camera::visibility::VisibilityPlugin,
        ))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_asset::<Image>()
            .insert_resource(GalleryViewer(Viewer::new(config).unwrap()));
        app
    }

    /// Model root with a camera nested under a rig node and two frame markers
    fn spawn_model(world: &mut World, with_camera: bool) -> Entity {
        world
            .spawn((Transform::default(), GalleryModel, Name::new("GalleryModel")))
            .with_children(|root| {
                if with_camera {
                    root.spawn((Transform::from_xyz(1.0, 0.0, 0.0), Name::new("CameraRig")))
                        .with_children(|rig| {
                            rig.spawn((Camera3d::default(), Transform::from_xyz(2.0, 5.0, 3.0), Name::new("Camera")));
                        });
                }
                root.spawn((Transform::from_xyz(3.0, 1.6, -1.0), Name::new("FramePoint.001")));
                root.spawn((Transform::from_xyz(-3.0, 1.6, -1.0), Name::new("FramePoint.002")));
            })
            .id()
    }

    fn prepare(world: &mut World, root: Entity) {
        world
            .run_system_once_with(|In(root): In<Entity>, mut setup: ModelSetup| setup.prepare(root), root)
            .unwrap();
    }

    fn viewer(world: &World) -> &Viewer {
        &world.resource::<GalleryViewer>().0
    }

    #[test]
    fn test_collect_model_nodes_depth_first_with_composed_transforms() {
        let mut world = World::new();
        let root = world
            .spawn(Transform::default())
            .with_children(|root| {
                root.spawn((Transform::from_xyz(0.0, 0.0, -2.0), Name::new("Room")))
                    .with_children(|room| {
                        room.spawn((Transform::from_xyz(1.0, 1.5, 0.0), Name::new("FramePoint.001")));
                        room.spawn((Transform::from_xyz(-1.0, 1.5, 0.0), Name::new("FramePoint.002")));
                    });
                root.spawn((Transform::from_xyz(0.0, 1.5, 3.0), Name::new("FramePoint.003")));
                root.spawn(Transform::from_xyz(9.0, 9.0, 9.0));
            })
            .id();

        let nodes = world
            .run_system_once(
                move |children_query: Query<&Children>,
                      node_query: Query<(&Transform, Option<&Name>, Has<Camera3d>)>| {
                    collect_model_nodes(root, &children_query, &node_query)
                },
            )
            .unwrap();

        let names: Vec<_> = nodes.named.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Room", "FramePoint.001", "FramePoint.002", "FramePoint.003"]);
        assert_eq!(nodes.named[1].translation, Vec3::new(1.0, 1.5, -2.0));
        assert_eq!(nodes.named[3].translation, Vec3::new(0.0, 1.5, 3.0));
        assert!(nodes.camera.is_none());
    }

    #[test]
    fn test_frames_planned_from_collected_nodes_cycle_images() {
        let mut world = World::new();
        let root = world
            .spawn(Transform::default())
            .with_children(|root| {
                for i in 0..4 {
                    root.spawn((Transform::from_xyz(i as f32, 1.5, -4.0), Name::new(format!("FramePoint.{i}"))));
                }
            })
            .id();

        let nodes = world
            .run_system_once(
                move |children_query: Query<&Children>,
                      node_query: Query<(&Transform, Option<&Name>, Has<Camera3d>)>| {
                    collect_model_nodes(root, &children_query, &node_query)
                },
            )
            .unwrap();

        let frames = FramesConfig {
            image_urls: vec!["a.jpg".to_string(), "b.jpg".to_string()],
            ..FramesConfig::default()
        };
        let placements = plan_frames(nodes.named, &frames).unwrap();
        let images: Vec<_> = placements.iter().map(|p| p.image.as_str()).collect();
        assert_eq!(images, vec!["a.jpg", "b.jpg", "a.jpg", "b.jpg"]);
        assert!((placements[0].translation.z - (-3.9)).abs() < 1e-5);
    }

    #[test]
    fn test_embedded_camera_is_adopted_detached_and_pinned() {
        let mut app = gallery_app(GalleryConfig::default());
        let world = app.world_mut();
        let root = spawn_model(world, true);

        prepare(world, root);

        let expected = Vec3::new(3.0, 1.6, 3.0);
        assert!(viewer(world).load().is_ready());
        assert!(viewer(world).has_camera());
        assert!(viewer(world).camera_pose().unwrap().position.abs_diff_eq(expected, 1e-5));

        let mut cameras = world.query_filtered::<(&Transform, Has<ChildOf>), With<GalleryCamera>>();
        let (transform, attached) = cameras.single(world).unwrap();
        assert!(!attached);
        assert!(transform.translation.abs_diff_eq(expected, 1e-5));

        assert!(world.entity(root).contains::<PendingGrounding>());
    }

    #[test]
    fn test_frame_meshes_carry_marker_name_and_resolve_forward_ray() {
        let mut app = gallery_app(GalleryConfig::default());
        let root = spawn_model(app.world_mut(), true);
        prepare(app.world_mut(), root);

        // Propagate transforms to the frames
        app.update();
        let world = app.world_mut();

        let mut frames = world.query_filtered::<(&Name, &Children), With<GalleryFrame>>();
        let mut frame_names: Vec<String> = frames
            .iter(world)
            .map(|(name, children)| {
                assert_eq!(children.len(), 3);
                name.as_str().to_string()
            })
            .collect();
        frame_names.sort();
        assert_eq!(frame_names, vec!["FramePoint.001", "FramePoint.002"]);

        let mut frame_meshes = world.query::<(Entity, &Name, &ChildOf, &Mesh3d)>();
        let meshes: Vec<(Entity, String, Entity, Handle<Mesh>)> = frame_meshes
            .iter(world)
            .map(|(entity, name, parent, mesh)| (entity, name.as_str().to_string(), parent.parent(), mesh.0.clone()))
            .collect();
        assert_eq!(meshes.len(), 6);
        for (entity, name, parent, handle) in meshes {
            assert_eq!(world.get::<Name>(parent).map(Name::as_str), Some(name.as_str()));
            let aabb = world
                .resource::<Assets<Mesh>>()
                .get(&handle)
                .and_then(|mesh| mesh.compute_aabb())
                .unwrap();
            world.entity_mut(entity).insert(aabb);
        }

        // The adopted camera faces -Z towards FramePoint.001
        let active = world
            .run_system_once(
                |mut viewer: ResMut<GalleryViewer>, mut ray_cast: MeshRayCast, names: Query<&Name>| {
                    let name_of = |entity: Entity| names.get(entity).ok().map(|name| name.as_str().to_string());
                    let mut scene = SceneRayCaster::new(&mut ray_cast, name_of);
                    viewer.0.tick(&RigInput::default(), &mut scene);
                    viewer.0.active_frame().map(str::to_string)
                },
            )
            .unwrap();
        assert_eq!(active.as_deref(), Some("FramePoint.001"));
    }

    #[test]
    fn test_fallback_camera_placed_when_model_has_none() {
        let mut config = GalleryConfig::default();
        config.camera.fallback_position = Some([0.0, 3.0, 2.0]);
        let mut app = gallery_app(config);
        let world = app.world_mut();
        let root = spawn_model(world, false);

        prepare(world, root);

        assert!(viewer(world).load().is_ready());
        let pose = viewer(world).camera_pose().unwrap();
        assert!(pose.position.abs_diff_eq(Vec3::new(0.0, 1.6, 2.0), 1e-5));

        let mut cameras = world.query_filtered::<&Transform, (With<GalleryCamera>, With<Camera3d>)>();
        assert_eq!(cameras.iter(world).count(), 1);
    }

    #[test]
    fn test_model_without_camera_or_fallback_stays_idle() {
        let mut app = gallery_app(GalleryConfig::default());
        let world = app.world_mut();
        let root = spawn_model(world, false);

        prepare(world, root);

        assert!(viewer(world).load().is_ready());
        assert!(!viewer(world).has_camera());
        let mut frames = world.query_filtered::<(), With<GalleryFrame>>();
        assert_eq!(frames.iter(world).count(), 2);
    }

    #[test]
    fn test_roots_other_than_the_model_are_ignored() {
        let mut app = gallery_app(GalleryConfig::default());
        let world = app.world_mut();
        let other = world.spawn(Transform::default()).id();

        prepare(world, other);

        assert!(!viewer(world).load().is_settled());
        assert!(!world.entity(other).contains::<PendingGrounding>());
    }

    #[test]
    fn test_load_states_map_to_load_events() {
        use RecursiveDependencyLoadState as Deps;

        assert_eq!(load_step(&LoadState::NotLoaded, &Deps::NotLoaded), LoadStep::Wait);
        assert_eq!(
            load_step(&LoadState::Loading, &Deps::Loading),
            LoadStep::Report(LoadEvent::Progress(0.0))
        );
        assert_eq!(
            load_step(&LoadState::Loaded, &Deps::Loading),
            LoadStep::Report(LoadEvent::Progress(0.5))
        );
        assert_eq!(load_step(&LoadState::Loaded, &Deps::Loaded), LoadStep::Spawn);

        let error = Arc::new(AssetLoadError::MissingAssetLoader {
            loader_name: None,
            asset_type_id: None,
            extension: Some("gltf".to_string()),
            asset_path: Some("scene.gltf".to_string()),
        });
        for step in [
            load_step(&LoadState::Failed(error.clone()), &Deps::NotLoaded),
            load_step(&LoadState::Loaded, &Deps::Failed(error)),
        ] {
            assert!(matches!(step, LoadStep::Report(LoadEvent::Failed(reason)) if reason.contains("scene.gltf")));
        }
    }
}
