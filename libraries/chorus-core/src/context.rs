//! Per-request context carried through every store call
//!
//! A `RequestContext` is created by the transport for each inbound request. It
//! carries a request id for log correlation and a cancellation token. Every
//! store statement is awaited through [`RequestContext::run`] or
//! [`RequestContext::guard`], so a cancelled request stops at its next
//! suspension point and reports [`ChorusError::Cancelled`].

use crate::error::{ChorusError, Result};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    cancel: CancellationToken,
}

impl RequestContext {
    /// Fresh context with its own cancellation token
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    /// Context bound to an existing token (e.g. a child of a shutdown token)
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            cancel,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel the request. Pending and future store calls fail with `Cancelled`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Await `fut` unless the request is cancelled first.
    ///
    /// The inner output is returned untouched so callers can classify store
    /// errors themselves.
    pub async fn guard<F>(&self, fut: F) -> Result<F::Output>
    where
        F: Future,
    {
        if self.cancel.is_cancelled() {
            return Err(ChorusError::Cancelled);
        }

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(ChorusError::Cancelled),
            out = fut => Ok(out),
        }
    }

    /// Like [`guard`](Self::guard), converting the inner error into `ChorusError`.
    pub async fn run<F, T, E>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: Into<ChorusError>,
    {
        self.guard(fut).await?.map_err(Into::into)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
