//! Gallery Viewer - First-person walk through a glTF gallery
//!
//! Runs in the browser (WASM entry point below) and on the desktop
//! (`gallery-viewer` binary).

mod app;

pub use app::run;

/// Configuration bundled into the build, used where no file system exists
pub const BUNDLED_CONFIG: &str = include_str!("../gallery.toml");

#[cfg(target_arch = "wasm32")]
mod web {
    use gallery_core::{GalleryConfig, Viewer};
    use wasm_bindgen::prelude::*;

    /// `?model=` in the page URL overrides the configured model path
    fn model_override() -> Option<String> {
        let window = web_sys::window()?;
        let href = window.location().href().ok()?;
        let url = web_sys::Url::new(&href).ok()?;
        url.search_params().get("model")
    }

    /// WASM entry point
    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        tracing_wasm::set_as_global_default_with_config(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(tracing::Level::INFO)
                .build(),
        );

        let mut config = GalleryConfig::from_toml_str(super::BUNDLED_CONFIG).unwrap_or_else(|err| {
            tracing::error!("Bundled configuration rejected, using defaults: {}", err);
            GalleryConfig::default()
        });

        if let Some(model) = model_override() {
            tracing::info!("Loading model from URL parameter: {}", model);
            config.model.path = model;
        }

        let viewer = match Viewer::new(config) {
            Ok(viewer) => viewer,
            Err(err) => {
                tracing::error!("Invalid configuration, using defaults: {}", err);
                match Viewer::new(GalleryConfig::default()) {
                    Ok(viewer) => viewer,
                    Err(err) => {
                        tracing::error!("Default configuration rejected: {}", err);
                        return;
                    }
                }
            }
        };

        super::run(viewer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::GalleryConfig;

    #[test]
    fn test_bundled_config_matches_defaults() {
        let bundled = GalleryConfig::from_toml_str(BUNDLED_CONFIG).unwrap();
        let defaults = GalleryConfig::default();

        assert_eq!(bundled.model.path, defaults.model.path);
        assert_eq!(bundled.frames.image_urls, defaults.frames.image_urls);
        assert_eq!(bundled.frames.marker_prefix, "FramePoint");
        assert_eq!(bundled.camera.eye_height, 1.6);
        assert!(bundled.camera.fallback_position.is_none());
        assert_eq!(bundled.collision.threshold, 0.5);
    }
}
