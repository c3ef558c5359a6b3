use std::sync::Arc;

use reel::catalog::Movie;
use reel::core::storage::FileStore;
use reel::core::{Collection, MoveOutcome, MovieLibrary, Snapshot};

// ============================================================================
// Helper Functions
// ============================================================================

fn movie(id: u64, title: &str) -> Movie {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": title,
        "original_title": title,
        "release_date": "2015-06-01",
        "vote_average": 7.1,
        "genre_ids": [35]
    }))
    .unwrap()
}

fn library_at(dir: &std::path::Path) -> MovieLibrary {
    MovieLibrary::new(Arc::new(FileStore::new(dir)))
}

// ============================================================================
// File-backed Library
// ============================================================================

#[tokio::test]
async fn test_collections_survive_a_new_library_instance() {
    let dir = tempfile::tempdir().unwrap();

    {
        let lib = library_at(dir.path());
        lib.add_to_saved(&movie(1, "Inside Out")).await;
        lib.add_to_saved(&movie(2, "Mad Max: Fury Road")).await;
        lib.add_to_watched(&movie(3, "Sicario")).await;
    }

    let lib = library_at(dir.path());
    let saved: Vec<_> = lib.get_saved().await.iter().map(|m| m.id).collect();
    assert_eq!(saved, vec![2, 1]);
    assert!(lib.is_in_watched(3).await);
    assert_eq!(lib.get_saved().await[0].title, "Mad Max: Fury Road");
}

#[tokio::test]
async fn test_blobs_are_json_arrays_under_fixed_keys() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library_at(dir.path());

    lib.add_to_watched(&movie(5, "Carol")).await;

    let raw = std::fs::read_to_string(dir.path().join("watched_movies.json")).unwrap();
    let parsed: Vec<Movie> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].id, 5);

    // The cross-collection removal wrote an empty saved list.
    let raw = std::fs::read_to_string(dir.path().join("saved_movies.json")).unwrap();
    assert_eq!(raw, "[]");
}

#[tokio::test]
async fn test_switching_collections_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library_at(dir.path());
    let m = movie(10, "Room");

    assert_eq!(lib.add_to_saved(&m).await, MoveOutcome::Inserted);
    assert_eq!(lib.add_to_watched(&m).await, MoveOutcome::Inserted);

    let reopened = library_at(dir.path());
    assert!(!reopened.is_in_saved(10).await);
    assert!(reopened.is_in_watched(10).await);
    assert_eq!(reopened.membership(10).await, Some(Collection::Watched));
}

#[tokio::test]
async fn test_corrupted_file_reads_as_empty_and_recovers_on_write() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("saved_movies.json"), "not json at all").unwrap();
    let lib = library_at(dir.path());

    assert!(matches!(lib.read(Collection::Saved).await, Snapshot::Unreadable(_)));
    assert!(lib.get_saved().await.is_empty());

    lib.add_to_saved(&movie(1, "Brooklyn")).await;

    assert!(matches!(lib.read(Collection::Saved).await, Snapshot::Stored(ref m) if m.len() == 1));
}

#[tokio::test]
async fn test_stored_record_with_nulls_is_readable() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("watched_movies.json"),
        r#"[{"id": 4, "title": "Tangerine", "overview": null, "release_date": null}]"#,
    )
    .unwrap();
    let lib = library_at(dir.path());

    assert!(matches!(lib.read(Collection::Watched).await, Snapshot::Stored(ref m) if m.len() == 1));

    lib.add_to_watched(&movie(5, "Carol")).await;
    let ids: Vec<_> = lib.get_watched().await.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![5, 4]);
}

#[tokio::test]
async fn test_missing_directory_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library_at(&dir.path().join("does-not-exist-yet"));

    assert!(matches!(lib.read(Collection::Watched).await, Snapshot::Empty));
    assert!(lib.get_watched().await.is_empty());
    assert!(!lib.is_in_watched(1).await);
}

#[test]
fn test_remove_speculatively_on_fresh_library() {
    let dir = tempfile::tempdir().unwrap();
    let lib = library_at(dir.path());

    tokio_test::block_on(async {
        lib.remove_from_saved(42).await;
        lib.remove_from_watched(42).await;
        assert!(lib.get_saved().await.is_empty());
        assert!(lib.get_watched().await.is_empty());
    });
}
