/// Collaborator traits for Chorus
use crate::context::RequestContext;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Blob store for playlist cover images
///
/// Implementations validate the payload and reject it with
/// `ChorusError::UnsupportedFormat`, `ChorusError::TooLarge` or
/// `ChorusError::InvalidInput`. Those errors are forwarded to callers
/// unchanged.
#[async_trait]
pub trait ThumbnailStore: Send + Sync {
    /// Validate and persist `data`, returning the locator to store on the playlist
    ///
    /// `key_hint` is a prefix for the stored object name; it is sanitized by
    /// the implementation.
    async fn upload_thumbnail(
        &self,
        ctx: &RequestContext,
        data: Bytes,
        key_hint: &str,
    ) -> Result<String>;
}
