//! Error types shared across the gallery crates

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("frame placement needs at least one image url")]
    EmptyImageList,
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GalleryError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field,
            reason: reason.into(),
        }
    }
}
