//! Ray casting seam between the proximity loop and the scene graph

use glam::Vec3;

/// One intersection reported by a ray cast
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin along the (unit) direction
    pub distance: f32,
    /// Scene name of the intersected object, if it has one
    pub name: Option<String>,
}

impl RayHit {
    pub fn new(distance: f32, name: impl Into<String>) -> Self {
        Self {
            distance,
            name: Some(name.into()),
        }
    }

    pub fn unnamed(distance: f32) -> Self {
        Self { distance, name: None }
    }

    pub fn name_starts_with(&self, prefix: &str) -> bool {
        self.name.as_deref().is_some_and(|name| name.starts_with(prefix))
    }
}

/// Anything that can intersect a ray with all scene geometry.
///
/// Implementations must return every hit ordered nearest-first.
pub trait RayCaster {
    fn cast(&mut self, origin: Vec3, direction: Vec3) -> Vec<RayHit>;
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Translation that lifts (or lowers) these bounds onto the Y = 0 floor
    pub fn floor_offset(&self) -> Vec3 {
        Vec3::new(0.0, -self.min.y, 0.0)
    }

    /// Distance to the first surface crossed by the ray, using the slab test.
    ///
    /// A ray starting inside the box reports the exit surface.
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (t0, t1) = {
                let a = (lo - o) * inv;
                let b = (hi - o) * inv;
                if a <= b { (a, b) } else { (b, a) }
            };
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            None
        } else if t_near >= 0.0 {
            Some(t_near)
        } else {
            Some(t_far)
        }
    }
}

/// In-memory scene of named boxes.
///
/// Used to drive the proximity loop without a renderer.
#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    boxes: Vec<(Option<String>, Aabb)>,
}

impl BoxScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_box(mut self, name: impl Into<String>, bounds: Aabb) -> Self {
        self.add_box(Some(name.into()), bounds);
        self
    }

    pub fn add_box(&mut self, name: Option<String>, bounds: Aabb) {
        self.boxes.push((name, bounds));
    }
}

impl RayCaster for BoxScene {
    fn cast(&mut self, origin: Vec3, direction: Vec3) -> Vec<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Vec::new();
        }

        let mut hits: Vec<RayHit> = self
            .boxes
            .iter()
            .filter_map(|(name, bounds)| {
                bounds.ray_distance(origin, direction).map(|distance| RayHit {
                    distance,
                    name: name.clone(),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
