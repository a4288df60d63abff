//! Playlists vertical slice: playlists, memberships and favorites
//!
//! Every function issues independent statements; none of them opens a
//! transaction. Where an invariant depends on a precondition (ownership,
//! visibility), the precondition is repeated inside the mutating statement
//! and a statement that matches nothing is reported as an error.

use crate::error::{classify, StorageError};
use chorus_core::{
    error::Result,
    feed::{self, FeedEntry},
    search::{self, SearchCandidate},
    ChorusError, CreatePlaylist, Playlist, PlaylistId, PlaylistLike, PlaylistToAdd,
    PlaylistTrackRequest, PlaylistWithLiked, RemovePlaylist, RequestContext, TrackId,
    UpdatePlaylist, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const PLAYLIST_COLUMNS: &str = "p.id, p.title, p.owner_id, p.thumbnail, p.is_public, p.created_at";

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn timestamp(ms: i64) -> std::result::Result<DateTime<Utc>, StorageError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StorageError::CorruptRow(format!("timestamp out of range: {ms}")))
}

fn playlist_from_row(row: &SqliteRow) -> std::result::Result<Playlist, StorageError> {
    Ok(Playlist {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        owner_id: row.try_get("owner_id")?,
        thumbnail: row.try_get("thumbnail")?,
        is_public: row.try_get::<i64, _>("is_public")? != 0,
        created_at: timestamp(row.try_get("created_at")?)?,
    })
}

fn map_rows<T>(
    rows: &[SqliteRow],
    f: impl Fn(&SqliteRow) -> std::result::Result<T, StorageError>,
) -> Result<Vec<T>> {
    rows.iter()
        .map(|row| f(row).map_err(ChorusError::from))
        .collect()
}

/// Explain why an owner-scoped statement matched no row.
///
/// The playlist is re-read: gone means `NotFound`, owned by someone else means
/// `PermissionDenied`.
async fn explain_scoped_miss(
    pool: &SqlitePool,
    ctx: &RequestContext,
    id: PlaylistId,
    user_id: UserId,
) -> ChorusError {
    match get_by_id(pool, ctx, id).await {
        Ok(playlist) if !playlist.is_owned_by(user_id) => ChorusError::PermissionDenied,
        Ok(_) => ChorusError::internal(format!(
            "owner-scoped statement on playlist {id} matched no row"
        )),
        Err(err) => err,
    }
}

/// Load a playlist and require `user_id` to own it
async fn get_owned(
    pool: &SqlitePool,
    ctx: &RequestContext,
    id: PlaylistId,
    user_id: UserId,
) -> Result<Playlist> {
    let playlist = get_by_id(pool, ctx, id).await?;
    if !playlist.is_owned_by(user_id) {
        tracing::debug!(
            request_id = %ctx.request_id(),
            playlist_id = id,
            user_id,
            "Rejected mutation by non-owner"
        );
        return Err(ChorusError::PermissionDenied);
    }
    Ok(playlist)
}

/// Create new playlist
pub async fn create(
    pool: &SqlitePool,
    ctx: &RequestContext,
    playlist: CreatePlaylist,
) -> Result<Playlist> {
    let result = ctx
        .guard(
            sqlx::query(
                r#"
                INSERT INTO playlists (title, owner_id, thumbnail, is_public, created_at, title_grams)
                VALUES (?, ?, ?, ?, ?, ?)
                RETURNING id, title, owner_id, thumbnail, is_public, created_at
                "#,
            )
            .bind(&playlist.title)
            .bind(playlist.owner_id)
            .bind(&playlist.thumbnail)
            .bind(playlist.is_public)
            .bind(now_millis())
            .bind(search::trigram_document(&playlist.title))
            .fetch_one(pool),
        )
        .await?;

    match result {
        Ok(row) => Ok(playlist_from_row(&row)?),
        Err(err) => Err(classify(err, || {
            ChorusError::Duplicate(format!(
                "playlist '{}' already exists for user {}",
                playlist.title, playlist.owner_id
            ))
        })),
    }
}

/// Get playlist by ID
pub async fn get_by_id(pool: &SqlitePool, ctx: &RequestContext, id: PlaylistId) -> Result<Playlist> {
    let row = ctx
        .run(
            sqlx::query(&format!(
                "SELECT {PLAYLIST_COLUMNS} FROM playlists p WHERE p.id = ?"
            ))
            .bind(id)
            .fetch_optional(pool),
        )
        .await?;

    match row {
        Some(row) => Ok(playlist_from_row(&row)?),
        None => Err(ChorusError::playlist_not_found(id)),
    }
}

/// Get playlist by ID along with whether `user_id` favorited it
pub async fn get_with_is_liked(
    pool: &SqlitePool,
    ctx: &RequestContext,
    id: PlaylistId,
    user_id: UserId,
) -> Result<PlaylistWithLiked> {
    let row = ctx
        .run(
            sqlx::query(&format!(
                r#"
                SELECT {PLAYLIST_COLUMNS}, f.user_id IS NOT NULL AS is_liked
                FROM playlists p
                LEFT JOIN playlist_favorites f ON f.playlist_id = p.id AND f.user_id = ?
                WHERE p.id = ?
                "#
            ))
            .bind(user_id)
            .bind(id)
            .fetch_optional(pool),
        )
        .await?;

    let Some(row) = row else {
        return Err(ChorusError::playlist_not_found(id));
    };

    Ok(PlaylistWithLiked {
        playlist: playlist_from_row(&row)?,
        is_liked: row.try_get::<i64, _>("is_liked").map_err(StorageError::from)? != 0,
    })
}

/// Owned playlists plus favorited playlists that are still public
pub async fn get_combined(
    pool: &SqlitePool,
    ctx: &RequestContext,
    user_id: UserId,
) -> Result<Vec<Playlist>> {
    let rows = ctx
        .run(
            sqlx::query(&format!(
                r#"
                SELECT {PLAYLIST_COLUMNS}, p.created_at AS activity_at
                FROM playlists p
                WHERE p.owner_id = ?
                UNION ALL
                SELECT {PLAYLIST_COLUMNS}, f.created_at AS activity_at
                FROM playlist_favorites f
                INNER JOIN playlists p ON p.id = f.playlist_id
                WHERE f.user_id = ? AND p.is_public = 1 AND p.owner_id != ?
                "#
            ))
            .bind(user_id)
            .bind(user_id)
            .bind(user_id)
            .fetch_all(pool),
        )
        .await?;

    let entries = map_rows(&rows, |row| {
        Ok(FeedEntry {
            playlist: playlist_from_row(row)?,
            activity_at: timestamp(row.try_get("activity_at")?)?,
        })
    })?;

    Ok(feed::combine(entries))
}

/// Check whether a track is a member of a playlist
pub async fn track_exists(
    pool: &SqlitePool,
    ctx: &RequestContext,
    playlist_id: PlaylistId,
    track_id: TrackId,
) -> Result<bool> {
    let exists: i64 = ctx
        .run(
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?)",
            )
            .bind(playlist_id)
            .bind(track_id)
            .fetch_one(pool),
        )
        .await?;

    Ok(exists != 0)
}

/// Add track to playlist (owner only)
pub async fn add_track(
    pool: &SqlitePool,
    ctx: &RequestContext,
    request: &PlaylistTrackRequest,
) -> Result<()> {
    let PlaylistTrackRequest {
        playlist_id,
        track_id,
        user_id,
    } = *request;

    get_owned(pool, ctx, playlist_id, user_id).await?;

    if track_exists(pool, ctx, playlist_id, track_id).await? {
        return Err(ChorusError::TrackDuplicate {
            playlist_id,
            track_id,
        });
    }

    // Ownership is re-asserted in the insert itself; a concurrent add of the
    // same pair trips the primary key.
    let result = ctx
        .guard(
            sqlx::query(
                r#"
                INSERT INTO playlist_tracks (playlist_id, track_id, created_at)
                SELECT id, ?, ? FROM playlists WHERE id = ? AND owner_id = ?
                "#,
            )
            .bind(track_id)
            .bind(now_millis())
            .bind(playlist_id)
            .bind(user_id)
            .execute(pool),
        )
        .await?;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            Err(explain_scoped_miss(pool, ctx, playlist_id, user_id).await)
        }
        Ok(_) => Ok(()),
        Err(err) => Err(classify(err, || ChorusError::TrackDuplicate {
            playlist_id,
            track_id,
        })),
    }
}

/// Remove track from playlist (owner only)
pub async fn remove_track(
    pool: &SqlitePool,
    ctx: &RequestContext,
    request: &PlaylistTrackRequest,
) -> Result<()> {
    let PlaylistTrackRequest {
        playlist_id,
        track_id,
        user_id,
    } = *request;

    get_owned(pool, ctx, playlist_id, user_id).await?;

    let done = ctx
        .run(
            sqlx::query(
                r#"
                DELETE FROM playlist_tracks
                WHERE playlist_id = ? AND track_id = ?
                  AND EXISTS (SELECT 1 FROM playlists WHERE id = ? AND owner_id = ?)
                "#,
            )
            .bind(playlist_id)
            .bind(track_id)
            .bind(playlist_id)
            .bind(user_id)
            .execute(pool),
        )
        .await?;

    if done.rows_affected() > 0 {
        return Ok(());
    }

    if track_exists(pool, ctx, playlist_id, track_id).await? {
        // Membership is there, so the ownership clause failed in between
        return Err(explain_scoped_miss(pool, ctx, playlist_id, user_id).await);
    }

    Err(ChorusError::TrackNotFound {
        playlist_id,
        track_id,
    })
}

/// Track ids in insertion order, ties broken by track id
pub async fn get_track_ids(
    pool: &SqlitePool,
    ctx: &RequestContext,
    playlist_id: PlaylistId,
) -> Result<Vec<TrackId>> {
    ctx.run(
        sqlx::query_scalar(
            r#"
            SELECT track_id FROM playlist_tracks
            WHERE playlist_id = ?
            ORDER BY created_at ASC, track_id ASC
            "#,
        )
        .bind(playlist_id)
        .fetch_all(pool),
    )
    .await
}

/// Update title (and thumbnail when supplied), scoped to the owner
pub async fn update(
    pool: &SqlitePool,
    ctx: &RequestContext,
    request: UpdatePlaylist,
) -> Result<Playlist> {
    let query = match &request.thumbnail {
        Some(thumbnail) => sqlx::query(
            r#"
            UPDATE playlists SET title = ?, title_grams = ?, thumbnail = ?
            WHERE id = ? AND owner_id = ?
            RETURNING id, title, owner_id, thumbnail, is_public, created_at
            "#,
        )
        .bind(&request.title)
        .bind(search::trigram_document(&request.title))
        .bind(thumbnail),
        None => sqlx::query(
            r#"
            UPDATE playlists SET title = ?, title_grams = ?
            WHERE id = ? AND owner_id = ?
            RETURNING id, title, owner_id, thumbnail, is_public, created_at
            "#,
        )
        .bind(&request.title)
        .bind(search::trigram_document(&request.title)),
    };

    let result = ctx
        .guard(
            query
                .bind(request.id)
                .bind(request.user_id)
                .fetch_optional(pool),
        )
        .await?;

    match result {
        Ok(Some(row)) => Ok(playlist_from_row(&row)?),
        Ok(None) => Err(explain_scoped_miss(pool, ctx, request.id, request.user_id).await),
        Err(err) => Err(classify(err, || {
            ChorusError::Duplicate(format!(
                "playlist '{}' already exists for user {}",
                request.title, request.user_id
            ))
        })),
    }
}

/// Delete playlist, scoped to the owner
pub async fn delete(pool: &SqlitePool, ctx: &RequestContext, request: &RemovePlaylist) -> Result<()> {
    let done = ctx
        .run(
            sqlx::query("DELETE FROM playlists WHERE id = ? AND owner_id = ?")
                .bind(request.id)
                .bind(request.user_id)
                .execute(pool),
        )
        .await?;

    if done.rows_affected() == 0 {
        return Err(explain_scoped_miss(pool, ctx, request.id, request.user_id).await);
    }

    Ok(())
}

/// The user's playlists, each flagged with whether `track_id` is already in it
pub async fn get_playlists_to_add(
    pool: &SqlitePool,
    ctx: &RequestContext,
    track_id: TrackId,
    user_id: UserId,
) -> Result<Vec<PlaylistToAdd>> {
    let rows = ctx
        .run(
            sqlx::query(&format!(
                r#"
                SELECT {PLAYLIST_COLUMNS},
                       EXISTS (
                           SELECT 1 FROM playlist_tracks pt
                           WHERE pt.playlist_id = p.id AND pt.track_id = ?
                       ) AS is_included
                FROM playlists p
                WHERE p.owner_id = ?
                ORDER BY p.created_at DESC, p.id DESC
                "#
            ))
            .bind(track_id)
            .bind(user_id)
            .fetch_all(pool),
        )
        .await?;

    map_rows(&rows, |row| {
        Ok(PlaylistToAdd {
            playlist: playlist_from_row(row)?,
            is_included_already: row.try_get::<i64, _>("is_included")? != 0,
        })
    })
}

/// Set visibility of every playlist owned by `user_id`
pub async fn update_publicity_by_user(
    pool: &SqlitePool,
    ctx: &RequestContext,
    user_id: UserId,
    is_public: bool,
) -> Result<u64> {
    let done = ctx
        .run(
            sqlx::query("UPDATE playlists SET is_public = ? WHERE owner_id = ?")
                .bind(is_public)
                .bind(user_id)
                .execute(pool),
        )
        .await?;

    Ok(done.rows_affected())
}

/// True iff the playlist exists and `user_id` does not own it
pub async fn exists_and_not_owned_by(
    pool: &SqlitePool,
    ctx: &RequestContext,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<bool> {
    let exists: i64 = ctx
        .run(
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM playlists WHERE id = ? AND owner_id != ?)",
            )
            .bind(playlist_id)
            .bind(user_id)
            .fetch_one(pool),
        )
        .await?;

    Ok(exists != 0)
}

async fn favorite_exists(pool: &SqlitePool, ctx: &RequestContext, like: &PlaylistLike) -> Result<bool> {
    let exists: i64 = ctx
        .run(
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM playlist_favorites WHERE user_id = ? AND playlist_id = ?)",
            )
            .bind(like.user_id)
            .bind(like.playlist_id)
            .fetch_one(pool),
        )
        .await?;

    Ok(exists != 0)
}

/// Favorite a playlist. Repeating the call is a no-op.
pub async fn like(pool: &SqlitePool, ctx: &RequestContext, request: &PlaylistLike) -> Result<()> {
    if !exists_and_not_owned_by(pool, ctx, request.playlist_id, request.user_id).await? {
        return Err(ChorusError::playlist_not_found(request.playlist_id));
    }

    let done = ctx
        .run(
            sqlx::query(
                r#"
                INSERT INTO playlist_favorites (user_id, playlist_id, created_at)
                SELECT ?, id, ? FROM playlists
                WHERE id = ? AND owner_id != ? AND is_public = 1
                ON CONFLICT (user_id, playlist_id) DO NOTHING
                "#,
            )
            .bind(request.user_id)
            .bind(now_millis())
            .bind(request.playlist_id)
            .bind(request.user_id)
            .execute(pool),
        )
        .await?;

    if done.rows_affected() > 0 || favorite_exists(pool, ctx, request).await? {
        return Ok(());
    }

    // Private playlists of other users are indistinguishable from missing ones
    Err(ChorusError::playlist_not_found(request.playlist_id))
}

/// Remove a favorite. Removing a missing favorite succeeds.
pub async fn unlike(pool: &SqlitePool, ctx: &RequestContext, request: &PlaylistLike) -> Result<()> {
    ctx.run(
        sqlx::query("DELETE FROM playlist_favorites WHERE user_id = ? AND playlist_id = ?")
            .bind(request.user_id)
            .bind(request.playlist_id)
            .execute(pool),
    )
    .await?;

    Ok(())
}

/// Playlists owned by `user_id`, newest first
pub async fn get_profile_playlists(
    pool: &SqlitePool,
    ctx: &RequestContext,
    user_id: UserId,
) -> Result<Vec<Playlist>> {
    let rows = ctx
        .run(
            sqlx::query(&format!(
                r#"
                SELECT {PLAYLIST_COLUMNS}
                FROM playlists p
                WHERE p.owner_id = ?
                ORDER BY p.created_at DESC, p.id DESC
                "#
            ))
            .bind(user_id)
            .fetch_all(pool),
        )
        .await?;

    map_rows(&rows, playlist_from_row)
}

/// Ranked search over public playlists and those owned by `user_id`
///
/// Candidates are the visible titles that match every token prefix, plus
/// those sharing enough trigrams with the query to possibly clear the
/// similarity threshold. Final ordering happens in [`search::rank`].
pub async fn search(
    pool: &SqlitePool,
    ctx: &RequestContext,
    query: &str,
    user_id: UserId,
) -> Result<Vec<Playlist>> {
    let tokens = search::tokenize(query);
    let Some(match_expr) = search::fts_prefix_query(&tokens) else {
        return Ok(Vec::new());
    };

    let terms = search::trigram_terms(query);
    let trigram_hits = if terms.is_empty() {
        "SELECT NULL AS playlist_id WHERE 0".to_string()
    } else {
        vec!["SELECT rowid AS playlist_id FROM playlists_trigrams WHERE playlists_trigrams MATCH ?"; terms.len()]
            .join(" UNION ALL ")
    };

    // bm25() is lower-is-better; negate so relevance grows with the match.
    // Each trigram phrase matches a row at most once, so the hit count per
    // row is the number of shared trigrams.
    let sql = format!(
        r#"
        WITH matches AS MATERIALIZED (
            SELECT rowid AS playlist_id, -bm25(playlists_fts) AS relevance
            FROM playlists_fts
            WHERE playlists_fts MATCH ?
        ),
        similar AS MATERIALIZED (
            SELECT playlist_id FROM ({trigram_hits})
            GROUP BY playlist_id
            HAVING COUNT(*) > ?
        )
        SELECT {PLAYLIST_COLUMNS}, m.relevance
        FROM playlists p
        LEFT JOIN matches m ON m.playlist_id = p.id
        WHERE (p.is_public = 1 OR p.owner_id = ?)
          AND (m.playlist_id IS NOT NULL OR p.id IN (SELECT playlist_id FROM similar))
        "#
    );

    let mut statement = sqlx::query(&sql).bind(match_expr);
    for term in &terms {
        statement = statement.bind(term);
    }
    let statement = statement
        .bind(search::min_shared_trigrams(terms.len()))
        .bind(user_id);

    let rows = ctx.run(statement.fetch_all(pool)).await?;

    let candidates = map_rows(&rows, |row| {
        Ok(SearchCandidate {
            playlist: playlist_from_row(row)?,
            relevance: row.try_get("relevance")?,
        })
    })?;

    tracing::debug!(
        request_id = %ctx.request_id(),
        tokens = tokens.len(),
        trigrams = terms.len(),
        candidates = candidates.len(),
        "Ranking playlist search"
    );

    Ok(search::rank(query, candidates))
}
