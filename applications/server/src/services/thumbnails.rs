/// Thumbnail storage service - manages playlist cover images on disk
use async_trait::async_trait;
use bytes::Bytes;
use chorus_core::{ChorusError, RequestContext, ThumbnailStore};
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

/// Prefix of every locator handed out by [`FileThumbnailStore`]
pub const LOCATOR_PREFIX: &str = "thumbnails";

/// Accepted cover image formats, detected from the leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            return Some(Self::Png);
        }
        if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(Self::Webp);
        }
        None
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileThumbnailStore {
    base_path: PathBuf,
    max_bytes: usize,
}

impl FileThumbnailStore {
    pub fn new(base_path: PathBuf, max_bytes: usize) -> Self {
        Self {
            base_path,
            max_bytes,
        }
    }

    /// Initialize storage directory
    pub async fn initialize(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.base_path).await
    }

    #[cfg(test)]
    fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    /// Resolve a locator returned by `upload_thumbnail` to its file
    #[cfg(test)]
    fn resolve(&self, locator: &str) -> Option<PathBuf> {
        let file_name = locator
            .strip_prefix(LOCATOR_PREFIX)?
            .strip_prefix('/')?;

        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return None;
        }

        Some(self.base_path.join(file_name))
    }
}

/// Keep only characters that are safe in a file name
fn sanitize_key_hint(key_hint: &str) -> String {
    let cleaned: String = key_hint
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(64)
        .collect();

    if cleaned.is_empty() {
        "thumbnail".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl ThumbnailStore for FileThumbnailStore {
    async fn upload_thumbnail(
        &self,
        ctx: &RequestContext,
        data: Bytes,
        key_hint: &str,
    ) -> chorus_core::Result<String> {
        if data.is_empty() {
            return Err(ChorusError::invalid_input("thumbnail is empty"));
        }

        if data.len() > self.max_bytes {
            return Err(ChorusError::TooLarge {
                size: data.len(),
                max: self.max_bytes,
            });
        }

        let format = ImageFormat::detect(&data).ok_or(ChorusError::UnsupportedFormat)?;

        let file_name = format!(
            "{}-{}.{}",
            sanitize_key_hint(key_hint),
            Uuid::new_v4(),
            format.extension()
        );
        let path = self.base_path.join(&file_name);

        ctx.guard(fs::write(&path, &data)).await?.map_err(|e| {
            tracing::error!(
                request_id = %ctx.request_id(),
                path = %path.display(),
                error = ?e,
                "Failed to write thumbnail"
            );
            ChorusError::internal(format!("failed to write thumbnail: {e}"))
        })?;

        tracing::debug!(
            request_id = %ctx.request_id(),
            file = %file_name,
            bytes = data.len(),
            "Stored thumbnail"
        );

        Ok(format!("{LOCATOR_PREFIX}/{file_name}"))
    }
}
