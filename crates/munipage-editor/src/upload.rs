//! Upload service backends.
//!
//! Both return CDN-shaped URLs (`<base>/<unique-name>`) so uploaded images pass
//! the default image policy.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::fs;
use tracing::info;

use munipage_render::{UploadError, UploadFile, UploadService, UploadedImage};

/// Unique, URL-safe file name for an upload.
fn stored_name(original: &str) -> String {
    let cleaned: String = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '-' })
        .collect();
    let cleaned = cleaned.trim_matches(['-', '.']);
    let cleaned = if cleaned.is_empty() { "image" } else { cleaned };
    format!("{}-{cleaned}", uuid::Uuid::new_v4().simple())
}

fn check(file: &UploadFile) -> Result<(), UploadError> {
    if !file.is_image() {
        return Err(UploadError::Rejected(format!(
            "{} is not an image ({})",
            file.name, file.content_type
        )));
    }
    if file.bytes.is_empty() {
        return Err(UploadError::Rejected(format!("{} is empty", file.name)));
    }
    Ok(())
}

/// Keeps uploads in memory. Used for testing.
#[derive(Debug)]
pub struct MemoryUploader {
    base_url: String,
    files: Mutex<Vec<(String, UploadFile)>>,
    unavailable: Option<String>,
}

impl MemoryUploader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            files: Mutex::new(Vec::new()),
            unavailable: None,
        }
    }

    /// An uploader whose every call fails as unavailable.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Self::new("")
        }
    }

    /// URLs handed out so far.
    pub fn urls(&self) -> Vec<String> {
        self.files.lock().iter().map(|(url, _)| url.clone()).collect()
    }
}

#[async_trait]
impl UploadService for MemoryUploader {
    async fn upload(&self, file: UploadFile) -> Result<UploadedImage, UploadError> {
        if let Some(reason) = &self.unavailable {
            return Err(UploadError::Unavailable(reason.clone()));
        }
        check(&file)?;
        let url = format!("{}/{}", self.base_url, stored_name(&file.name));
        self.files.lock().push((url.clone(), file));
        Ok(UploadedImage { url })
    }
}

/// Copies uploads into a directory and serves them under `base_url`.
#[derive(Debug, Clone)]
pub struct LocalUploader {
    dir: PathBuf,
    base_url: String,
}

impl LocalUploader {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl UploadService for LocalUploader {
    async fn upload(&self, file: UploadFile) -> Result<UploadedImage, UploadError> {
        check(&file)?;
        let name = stored_name(&file.name);
        fs::create_dir_all(&self.dir).await?;
        let target = self.dir.join(&name);
        fs::write(&target, &file.bytes).await?;
        info!(file = %target.display(), bytes = file.bytes.len(), "image stored");
        Ok(UploadedImage {
            url: format!("{}/{name}", self.base_url),
        })
    }
}
