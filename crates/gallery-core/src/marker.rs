//! Frame placement at `FramePoint` markers
//!
//! Markers are empty nodes authored in the gallery model. Every node whose
//! name starts with the marker prefix gets a picture frame, and pictures are
//! handed out in discovery order, wrapping around when there are more
//! markers than pictures.

use glam::{Quat, Vec3};
use tracing::{debug, info};

use crate::config::FramesConfig;
use crate::error::GalleryError;

/// Default name prefix for marker nodes
pub const MARKER_PREFIX: &str = "FramePoint";

/// A named node found while traversing the model
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Marker {
    pub fn new(name: impl Into<String>, translation: Vec3, rotation: Quat) -> Self {
        Self {
            name: name.into(),
            translation,
            rotation,
        }
    }

    pub fn is_marker(&self, prefix: &str) -> bool {
        self.name.starts_with(prefix)
    }
}

/// Where a frame goes and which picture it shows
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlacement {
    /// Frame name, copied from its marker
    pub name: String,
    pub image: String,
    pub translation: Vec3,
    pub rotation: Quat,
}

impl FramePlacement {
    /// Outward normal of the picture face
    pub fn facing(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Plan one frame per marker among `nodes`, in traversal order.
pub fn plan_frames<I>(nodes: I, frames: &FramesConfig) -> Result<Vec<FramePlacement>, GalleryError>
where
    I: IntoIterator<Item = Marker>,
{
    if frames.image_urls.is_empty() {
        return Err(GalleryError::EmptyImageList);
    }

    let placements: Vec<FramePlacement> = nodes
        .into_iter()
        .filter(|node| node.is_marker(&frames.marker_prefix))
        .enumerate()
        .map(|(index, marker)| {
            let image = frames.image_urls[index % frames.image_urls.len()].clone();
            let translation = marker.translation + marker.rotation * Vec3::Z * frames.offset;
            debug!(marker = %marker.name, %image, "Planned frame");
            FramePlacement {
                name: marker.name,
                image,
                translation,
                rotation: marker.rotation,
            }
        })
        .collect();

    info!(count = placements.len(), "Planned gallery frames");
    Ok(placements)
}
