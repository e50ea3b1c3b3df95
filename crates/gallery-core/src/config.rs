//! Configuration loading and validation

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::error::GalleryError;
use crate::marker::MARKER_PREFIX;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GalleryConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub frames: FramesConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub collision: CollisionConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelConfig {
    /// glTF scene to walk through
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Shift the model so its lowest point sits at Y = 0
    #[serde(default = "default_true")]
    pub ground_to_floor: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            ground_to_floor: true,
        }
    }
}

fn default_model_path() -> String {
    "assets/threeD/test7/scene.gltf".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FramesConfig {
    /// Name prefix identifying marker nodes in the model
    #[serde(default = "default_marker_prefix")]
    pub marker_prefix: String,
    /// Pictures assigned to markers in discovery order, cycling
    #[serde(default = "default_image_urls")]
    pub image_urls: Vec<String>,
    #[serde(default = "default_frame_size")]
    pub width: f32,
    #[serde(default = "default_frame_size")]
    pub height: f32,
    #[serde(default = "default_frame_depth")]
    pub depth: f32,
    /// Distance a frame is pushed along the marker's local +Z
    #[serde(default = "default_frame_offset")]
    pub offset: f32,
}

impl Default for FramesConfig {
    fn default() -> Self {
        Self {
            marker_prefix: default_marker_prefix(),
            image_urls: default_image_urls(),
            width: default_frame_size(),
            height: default_frame_size(),
            depth: default_frame_depth(),
            offset: default_frame_offset(),
        }
    }
}

fn default_marker_prefix() -> String {
    MARKER_PREFIX.to_string()
}

fn default_image_urls() -> Vec<String> {
    vec![
        "assets/images/frame1.jpg".to_string(),
        "assets/images/frame2.jpg".to_string(),
        "assets/images/frame3.jpg".to_string(),
    ]
}

fn default_frame_size() -> f32 {
    2.0
}

fn default_frame_depth() -> f32 {
    0.05
}

fn default_frame_offset() -> f32 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CameraConfig {
    /// Height the camera is pinned to after every tick
    #[serde(default = "default_eye_height")]
    pub eye_height: f32,
    /// Nominal time step handed to the rig each tick
    #[serde(default = "default_fixed_step")]
    pub fixed_step: f32,
    #[serde(default = "default_look_speed")]
    pub look_speed: f32,
    #[serde(default = "default_movement_speed")]
    pub movement_speed: f32,
    #[serde(default = "default_true")]
    pub look_vertical: bool,
    #[serde(default = "default_true")]
    pub constrain_vertical: bool,
    /// Lower polar angle bound (radians) when `constrain_vertical` is set
    #[serde(default = "default_vertical_min")]
    pub vertical_min: f32,
    /// Upper polar angle bound (radians) when `constrain_vertical` is set
    #[serde(default = "default_vertical_max")]
    pub vertical_max: f32,
    /// Where to put a camera when the model does not embed one.
    /// Without it the viewer stays inert until a camera exists.
    #[serde(default)]
    pub fallback_position: Option<[f32; 3]>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye_height: default_eye_height(),
            fixed_step: default_fixed_step(),
            look_speed: default_look_speed(),
            movement_speed: default_movement_speed(),
            look_vertical: true,
            constrain_vertical: true,
            vertical_min: default_vertical_min(),
            vertical_max: default_vertical_max(),
            fallback_position: None,
        }
    }
}

fn default_eye_height() -> f32 {
    1.6
}

fn default_fixed_step() -> f32 {
    0.1
}

fn default_look_speed() -> f32 {
    0.003
}

fn default_movement_speed() -> f32 {
    0.4
}

fn default_vertical_min() -> f32 {
    1.0
}

fn default_vertical_max() -> f32 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollisionConfig {
    /// Hits nearer than this push the camera back
    #[serde(default = "default_collision_threshold")]
    pub threshold: f32,
    /// Push-back distance per offending direction
    #[serde(default = "default_collision_step")]
    pub step: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            threshold: default_collision_threshold(),
            step: default_collision_step(),
        }
    }
}

fn default_collision_threshold() -> f32 {
    0.5
}

fn default_collision_step() -> f32 {
    0.1
}

impl GalleryConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, GalleryError> {
        let config: GalleryConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would produce a broken viewer
    pub fn validate(&self) -> Result<(), GalleryError> {
        if self.frames.image_urls.is_empty() {
            return Err(GalleryError::EmptyImageList);
        }
        if self.frames.marker_prefix.is_empty() {
            return Err(GalleryError::invalid("frames.marker_prefix", "must not be empty"));
        }
        positive("frames.width", self.frames.width)?;
        positive("frames.height", self.frames.height)?;
        positive("frames.depth", self.frames.depth)?;
        positive("frames.offset", self.frames.offset)?;
        positive("camera.fixed_step", self.camera.fixed_step)?;
        positive("collision.threshold", self.collision.threshold)?;
        positive("collision.step", self.collision.step)?;
        if self.camera.vertical_min >= self.camera.vertical_max {
            return Err(GalleryError::invalid(
                "camera.vertical_min",
                format!(
                    "{} must be below camera.vertical_max ({})",
                    self.camera.vertical_min, self.camera.vertical_max
                ),
            ));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), GalleryError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GalleryError::invalid(field, format!("{value} is not a positive number")))
    }
}

/// Load configuration from file, falling back to defaults when it is absent
pub fn load_config(path: &Path) -> Result<GalleryConfig, GalleryError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = GalleryConfig::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(GalleryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = GalleryConfig::default();
        config.validate().unwrap();
        assert_eq!(config.camera.eye_height, 1.6);
        assert_eq!(config.collision.threshold, 0.5);
        assert_eq!(config.collision.step, 0.1);
        assert_eq!(config.frames.image_urls.len(), 3);
        assert_eq!(config.frames.marker_prefix, "FramePoint");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GalleryConfig::from_toml_str(
            r#"
            [model]
            path = "halls/east.glb"

            [camera]
            eye_height = 1.75
            fallback_position = [0.0, 1.75, 4.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.model.path, "halls/east.glb");
        assert!(config.model.ground_to_floor);
        assert_eq!(config.camera.eye_height, 1.75);
        assert_eq!(config.camera.fallback_position, Some([0.0, 1.75, 4.0]));
        assert_eq!(config.camera.movement_speed, 0.4);
        assert_eq!(config.frames, FramesConfig::default());
    }

    #[test]
    fn test_empty_image_list_fails_fast() {
        let err = GalleryConfig::from_toml_str(
            r#"
            [frames]
            image_urls = []
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, GalleryError::EmptyImageList));
    }

    #[test]
    fn test_rejects_inverted_vertical_bounds() {
        let mut config = GalleryConfig::default();
        config.camera.vertical_min = 2.0;
        config.camera.vertical_max = 1.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            GalleryError::InvalidSetting { field: "camera.vertical_min", .. }
        ));
    }

    #[test]
    fn test_rejects_non_positive_collision_step() {
        let mut config = GalleryConfig::default();
        config.collision.step = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [frames]
            image_urls = ["a.png", "b.png"]

            [collision]
            threshold = 0.75
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.frames.image_urls, vec!["a.png", "b.png"]);
        assert_eq!(config.collision.threshold, 0.75);
        assert_eq!(config.collision.step, 0.1);
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("gallery.toml")).unwrap();
        assert_eq!(config, GalleryConfig::default());
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        let err = GalleryConfig::from_toml_str("[camera\neye_height = 1").unwrap_err();
        assert!(matches!(err, GalleryError::Toml(_)));
    }
}
