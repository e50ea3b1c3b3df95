//! Mesh ray casting behind the core `RayCaster` seam

use bevy::prelude::*;
use bevy_picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use gallery_core::{RayCaster, RayHit};

/// Casts against every mesh in the world, naming hits through `name_of`
/// (normally a lookup of the `Name` component).
///
/// Visibility is ignored: the collision probes point along fixed world axes
/// and must see walls outside the camera frustum.
pub struct SceneRayCaster<'a, 'w, 's, F>
where
    F: Fn(Entity) -> Option<String>,
{
    ray_cast: &'a mut MeshRayCast<'w, 's>,
    name_of: F,
}

impl<'a, 'w, 's, F> SceneRayCaster<'a, 'w, 's, F>
where
    F: Fn(Entity) -> Option<String>,
{
    pub fn new(ray_cast: &'a mut MeshRayCast<'w, 's>, name_of: F) -> Self {
        Self { ray_cast, name_of }
    }
}

impl<F> RayCaster for SceneRayCaster<'_, '_, '_, F>
where
    F: Fn(Entity) -> Option<String>,
{
    fn cast(&mut self, origin: Vec3, direction: Vec3) -> Vec<RayHit> {
        let Ok(direction) = Dir3::new(direction) else {
            return Vec::new();
        };

        // Every hit is needed for the forward ray, not only the first
        let settings = MeshRayCastSettings::default()
            .with_visibility(RayCastVisibility::Any)
            .never_early_exit();
        let hits = self.ray_cast.cast_ray(Ray3d::new(origin, direction), &settings);
        hits.iter()
            .map(|(entity, hit)| RayHit {
                distance: hit.distance,
                name: (self.name_of)(*entity),
            })
            .collect()
    }
}
