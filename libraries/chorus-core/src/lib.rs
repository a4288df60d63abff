//! Chorus Core
//!
//! Store-agnostic types, traits and ranking rules for the Chorus playlist
//! service.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Playlist`, `PlaylistWithLiked`, `PlaylistToAdd` and the
//!   request records the usecase layer passes to a repository
//! - **Core Traits**: `PlaylistRepository` (store access) and `ThumbnailStore`
//!   (blob collaborator)
//! - **Error Handling**: Unified `ChorusError` with stable `ErrorKind`s
//! - **Ordering Rules**: search ranking (`search`) and feed ordering (`feed`),
//!   kept here so they can be tested without a store
//!
//! # Example
//!
//! ```rust
//! use chorus_core::search;
//!
//! let tokens = search::tokenize("Road Trip!");
//! assert_eq!(tokens, vec!["road", "trip"]);
//! assert_eq!(
//!     search::fts_prefix_query(&tokens).as_deref(),
//!     Some(r#""road"* AND "trip"*"#)
//! );
//! ```

#![forbid(unsafe_code)]

pub mod context;
pub mod error;
pub mod feed;
pub mod search;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use context::RequestContext;
pub use error::{ChorusError, ErrorKind, Result};
pub use storage::PlaylistRepository;
pub use traits::ThumbnailStore;

pub use types::{
    CreatePlaylist, Playlist, PlaylistId, PlaylistLike, PlaylistToAdd, PlaylistTrackRequest,
    PlaylistWithLiked, RemovePlaylist, TrackId, UpdatePlaylist, UserId,
};
