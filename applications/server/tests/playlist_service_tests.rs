/// Playlist service tests
/// Authorization and orchestration against a real SQLite repository
mod common;

use bytes::Bytes;
use chorus_core::{
    ChorusError, CreatePlaylist, ErrorKind, PlaylistLike, PlaylistRepository,
    PlaylistTrackRequest, RemovePlaylist, RequestContext, UpdatePlaylist,
};
use common::{create_test_service, fixtures::*, MockThumbnails};

fn gym(is_public: bool) -> CreatePlaylist {
    CreatePlaylist {
        title: "Gym".to_string(),
        owner_id: OWNER,
        thumbnail: None,
        is_public,
    }
}

/// Private playlist lifecycle seen from its owner and a stranger
#[tokio::test]
async fn test_private_playlist_scenario() {
    let (service, _repo, _temp_dir) = create_test_service(MockThumbnails::new()).await;
    let ctx = RequestContext::new();

    let playlist = service.create_playlist(&ctx, gym(false)).await.unwrap();

    let result = service
        .get_playlist_by_id(&ctx, playlist.id, OTHER_USER)
        .await;
    assert!(matches!(result, Err(ChorusError::PermissionDenied)));

    let add = PlaylistTrackRequest {
        playlist_id: playlist.id,
        track_id: TRACK,
        user_id: OWNER,
    };
    service.add_track_to_playlist(&ctx, add).await.unwrap();

    let result = service.add_track_to_playlist(&ctx, add).await;
    assert!(matches!(result, Err(ChorusError::TrackDuplicate { .. })));

    service
        .update_playlists_publicity(&ctx, OWNER, true)
        .await
        .unwrap();

    let seen = service
        .get_playlist_by_id(&ctx, playlist.id, OTHER_USER)
        .await
        .unwrap();
    assert_eq!(seen.playlist.id, playlist.id);
    assert_eq!(seen.playlist.title, "Gym");
    assert!(seen.playlist.is_public);
    assert!(!seen.is_liked);
}

#[tokio::test]
async fn test_create_rejects_blank_title_before_store() {
    let (service, repo, _temp_dir) = create_test_service(MockThumbnails::new()).await;
    let ctx = RequestContext::new();

    let result = service
        .create_playlist(
            &ctx,
            CreatePlaylist {
                title: "   ".to_string(),
                ..gym(true)
            },
        )
        .await;
    assert!(matches!(result, Err(ChorusError::InvalidInput(_))));

    let profile = repo.get_profile_playlists(&ctx, OWNER).await.unwrap();
    assert!(profile.is_empty());
}

#[tokio::test]
async fn test_create_trims_title_and_reports_duplicate() {
    let (service, _repo, _temp_dir) = create_test_service(MockThumbnails::new()).await;
    let ctx = RequestContext::new();

    let created = service
        .create_playlist(
            &ctx,
            CreatePlaylist {
                title: "  Gym ".to_string(),
                ..gym(true)
            },
        )
        .await
        .unwrap();
    assert_eq!(created.title, "Gym");

    let err = service.create_playlist(&ctx, gym(false)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
}

#[tokio::test]
async fn test_update_and_remove_require_owner() {
    let (service, repo, _temp_dir) = create_test_service(MockThumbnails::new()).await;
    let ctx = RequestContext::new();

    let playlist = service.create_playlist(&ctx, gym(true)).await.unwrap();

    let result = service
        .update_playlist(
            &ctx,
            UpdatePlaylist {
                id: playlist.id,
                user_id: OTHER_USER,
                title: "Hijacked".to_string(),
                thumbnail: None,
            },
        )
        .await;
    assert!(matches!(result, Err(ChorusError::PermissionDenied)));

    let result = service
        .remove_playlist(
            &ctx,
            RemovePlaylist {
                id: playlist.id,
                user_id: OTHER_USER,
            },
        )
        .await;
    assert!(matches!(result, Err(ChorusError::PermissionDenied)));

    let unchanged = repo.get_playlist_by_id(&ctx, playlist.id).await.unwrap();
    assert_eq!(unchanged.title, "Gym");

    let result = service
        .update_playlist(
            &ctx,
            UpdatePlaylist {
                id: 9_999,
                user_id: OWNER,
                title: "Ghost".to_string(),
                thumbnail: None,
            },
        )
        .await;
    assert!(matches!(result, Err(ChorusError::NotFound { .. })));

    let renamed = service
        .update_playlist(
            &ctx,
            UpdatePlaylist {
                id: playlist.id,
                user_id: OWNER,
                title: "Leg Day".to_string(),
                thumbnail: Some("thumbnails/leg.png".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.title, "Leg Day");
    assert_eq!(renamed.thumbnail.as_deref(), Some("thumbnails/leg.png"));

    service
        .remove_playlist(
            &ctx,
            RemovePlaylist {
                id: playlist.id,
                user_id: OWNER,
            },
        )
        .await
        .unwrap();

    let result = service
        .get_playlist_by_id(&ctx, playlist.id, OWNER)
        .await;
    assert!(matches!(result, Err(ChorusError::NotFound { .. })));
}

#[tokio::test]
async fn test_track_ids_follow_visibility() {
    let (service, _repo, _temp_dir) = create_test_service(MockThumbnails::new()).await;
    let ctx = RequestContext::new();

    let playlist = service.create_playlist(&ctx, gym(false)).await.unwrap();
    for track_id in [3, 1, 2] {
        service
            .add_track_to_playlist(
                &ctx,
                PlaylistTrackRequest {
                    playlist_id: playlist.id,
                    track_id,
                    user_id: OWNER,
                },
            )
            .await
            .unwrap();
    }

    let ids = service
        .get_playlist_track_ids(&ctx, playlist.id, OWNER)
        .await
        .unwrap();
    assert_eq!(ids, vec![3, 1, 2]);

    let result = service
        .get_playlist_track_ids(&ctx, playlist.id, OTHER_USER)
        .await;
    assert!(matches!(result, Err(ChorusError::PermissionDenied)));
}

#[tokio::test]
async fn test_like_toggle_is_idempotent() {
    let (service, _repo, _temp_dir) = create_test_service(MockThumbnails::new()).await;
    let ctx = RequestContext::new();

    let playlist = service.create_playlist(&ctx, gym(true)).await.unwrap();
    let like = PlaylistLike {
        playlist_id: playlist.id,
        user_id: OTHER_USER,
    };

    service.like_playlist(&ctx, like, true).await.unwrap();
    service.like_playlist(&ctx, like, true).await.unwrap();

    let seen = service
        .get_playlist_by_id(&ctx, playlist.id, OTHER_USER)
        .await
        .unwrap();
    assert!(seen.is_liked);

    let feed = service
        .get_combined_playlists(&ctx, OTHER_USER)
        .await
        .unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, playlist.id);

    service.like_playlist(&ctx, like, false).await.unwrap();
    service.like_playlist(&ctx, like, false).await.unwrap();

    let seen = service
        .get_playlist_by_id(&ctx, playlist.id, OTHER_USER)
        .await
        .unwrap();
    assert!(!seen.is_liked);
}

#[tokio::test]
async fn test_like_private_or_own_is_not_found() {
    let (service, _repo, _temp_dir) = create_test_service(MockThumbnails::new()).await;
    let ctx = RequestContext::new();

    let playlist = service.create_playlist(&ctx, gym(false)).await.unwrap();

    for user_id in [OTHER_USER, OWNER] {
        let err = service
            .like_playlist(
                &ctx,
                PlaylistLike {
                    playlist_id: playlist.id,
                    user_id,
                },
                true,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

#[tokio::test]
async fn test_profile_hides_private_playlists_from_others() {
    let (service, _repo, _temp_dir) = create_test_service(MockThumbnails::new()).await;
    let ctx = RequestContext::new();

    service.create_playlist(&ctx, gym(false)).await.unwrap();
    service
        .create_playlist(
            &ctx,
            CreatePlaylist {
                title: "Cooldown".to_string(),
                ..gym(true)
            },
        )
        .await
        .unwrap();

    let own_view = service
        .get_profile_playlists(&ctx, OWNER, OWNER)
        .await
        .unwrap();
    assert_eq!(own_view.len(), 2);

    let public_view = service
        .get_profile_playlists(&ctx, OWNER, OTHER_USER)
        .await
        .unwrap();
    assert_eq!(public_view.len(), 1);
    assert_eq!(public_view[0].title, "Cooldown");
}

#[tokio::test]
async fn test_search_through_service() {
    let (service, _repo, _temp_dir) = create_test_service(MockThumbnails::new()).await;
    let ctx = RequestContext::new();

    for title in ["Road Trip Mix", "Trip Hop Classics", "Gym"] {
        service
            .create_playlist(
                &ctx,
                CreatePlaylist {
                    title: title.to_string(),
                    ..gym(true)
                },
            )
            .await
            .unwrap();
    }

    let results = service
        .search_playlists(&ctx, "trip", OTHER_USER)
        .await
        .unwrap();
    let titles: Vec<_> = results.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Road Trip Mix", "Trip Hop Classics"]);
}

#[tokio::test]
async fn test_playlists_to_add_marks_membership() {
    let (service, _repo, _temp_dir) = create_test_service(MockThumbnails::new()).await;
    let ctx = RequestContext::new();

    let playlist = service.create_playlist(&ctx, gym(true)).await.unwrap();
    service
        .add_track_to_playlist(
            &ctx,
            PlaylistTrackRequest {
                playlist_id: playlist.id,
                track_id: TRACK,
                user_id: OWNER,
            },
        )
        .await
        .unwrap();

    let candidates = service
        .get_playlists_to_add(&ctx, TRACK, OWNER)
        .await
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].is_included_already);

    let candidates = service
        .get_playlists_to_add(&ctx, TRACK + 1, OWNER)
        .await
        .unwrap();
    assert!(!candidates[0].is_included_already);
}

#[tokio::test]
async fn test_thumbnail_upload_delegates_to_store() {
    let mut thumbnails = MockThumbnails::new();
    thumbnails
        .expect_upload_thumbnail()
        .withf(|_, data, key_hint| data.to_vec() == b"cover" && key_hint.to_string() == "user-7")
        .times(1)
        .returning(|_, _, _| Ok("thumbnails/user-7-abc.png".to_string()));

    let (service, _repo, _temp_dir) = create_test_service(thumbnails).await;
    let ctx = RequestContext::new();

    let locator = service
        .upload_playlist_thumbnail(&ctx, OWNER, Bytes::from_static(b"cover"))
        .await
        .unwrap();
    assert_eq!(locator, "thumbnails/user-7-abc.png");
}

#[tokio::test]
async fn test_thumbnail_rejection_forwarded_unchanged() {
    let mut thumbnails = MockThumbnails::new();
    thumbnails
        .expect_upload_thumbnail()
        .returning(|_, data, _| {
            Err(ChorusError::TooLarge {
                size: data.len(),
                max: 1,
            })
        });

    let (service, _repo, _temp_dir) = create_test_service(thumbnails).await;
    let ctx = RequestContext::new();

    let result = service
        .upload_playlist_thumbnail(&ctx, OWNER, Bytes::from_static(b"too big"))
        .await;
    assert!(matches!(
        result,
        Err(ChorusError::TooLarge { size: 7, max: 1 })
    ));
}

#[tokio::test]
async fn test_cancelled_request_does_not_write() {
    let (service, repo, _temp_dir) = create_test_service(MockThumbnails::new()).await;
    let ctx = RequestContext::new();
    ctx.cancel();

    let result = service.create_playlist(&ctx, gym(true)).await;
    assert!(matches!(result, Err(ChorusError::Cancelled)));

    let fresh = RequestContext::new();
    assert!(repo
        .get_profile_playlists(&fresh, OWNER)
        .await
        .unwrap()
        .is_empty());
}
