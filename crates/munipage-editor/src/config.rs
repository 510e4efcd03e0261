//! Editor configuration, stored as RON.
//!
//! Looked up at an explicit path, else `<config_dir>/munipage/editor.ron`.
//! A missing default file means defaults; a file that fails to parse is an
//! error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use munipage_render::{CDN_HOST, ImagePolicy};

use crate::error::EditorError;
use crate::reorder::DEFAULT_ACTIVATION_DISTANCE;

pub const DEFAULT_CDN_BASE_URL: &str = "https://res.cloudinary.com/munidepo/image/upload";
pub const DEFAULT_UPLOAD_FOLDER: &str = "munidepo/hero";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Hosts whose images may be rendered.
    pub allowed_image_hosts: Vec<String>,
    /// Accept `blob:` preview URLs for images picked but not yet uploaded.
    pub allow_preview_urls: bool,
    /// Pointer travel before a press on a block becomes a drag.
    pub drag_activation_distance: f32,
    /// Add CDN format/quality/width transformations to image URLs.
    pub optimize_images: bool,
    /// Base URL returned for uploaded images.
    pub cdn_base_url: String,
    pub upload_folder: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            allowed_image_hosts: vec![CDN_HOST.to_string()],
            allow_preview_urls: true,
            drag_activation_distance: DEFAULT_ACTIVATION_DISTANCE,
            optimize_images: true,
            cdn_base_url: DEFAULT_CDN_BASE_URL.to_string(),
            upload_folder: DEFAULT_UPLOAD_FOLDER.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("munipage").join("editor.ron"))
    }

    pub fn from_ron(text: &str) -> Result<Self, EditorError> {
        ron::from_str(text).map_err(|e| EditorError::Config(e.to_string()))
    }

    pub fn to_ron(&self) -> Result<String, EditorError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| EditorError::Config(e.to_string()))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, EditorError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), "loading editor config");
                Self::from_ron(&text)
                    .map_err(|e| EditorError::Config(format!("{}: {e}", path.display())))
            }
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no editor config, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(EditorError::Config(format!("{}: {e}", path.display()))),
        }
    }

    /// The render-side image trust policy.
    pub fn image_policy(&self) -> ImagePolicy {
        ImagePolicy::new(self.allowed_image_hosts.iter().cloned())
            .with_preview_urls(self.allow_preview_urls)
            .with_optimize(self.optimize_images)
    }

    /// Public URL prefix for uploaded files.
    pub fn upload_base_url(&self) -> String {
        let base = self.cdn_base_url.trim_end_matches('/');
        let folder = self.upload_folder.trim_matches('/');
        if folder.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{folder}")
        }
    }
}
