mod ids;
mod playlist;

pub use ids::{PlaylistId, TrackId, UserId};
pub use playlist::{
    CreatePlaylist, Playlist, PlaylistLike, PlaylistToAdd, PlaylistTrackRequest,
    PlaylistWithLiked, RemovePlaylist, UpdatePlaylist,
};
