use puzzle_core::model::{ACHIEVEMENTS, AchievementRecord, CompletionRecord, PuzzleId};
use storage::repository::{KeyValueStore, ProgressRepository, Storage, keys};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_kv_set_get_remove() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("missing").await.unwrap(), None);

    repo.set("greeting", "\"hello\"").await.unwrap();
    repo.set("greeting", "\"bye\"").await.unwrap();
    assert_eq!(repo.get("greeting").await.unwrap().as_deref(), Some("\"bye\""));

    repo.remove("greeting").await.unwrap();
    repo.remove("greeting").await.unwrap();
    assert_eq!(repo.get("greeting").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn sqlite_progress_round_trip() {
    let storage = Storage::sqlite("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("storage");

    let mut record = CompletionRecord::default();
    record.record(PuzzleId::new("2"), 700);
    record.record(PuzzleId::new("2"), 650);
    storage.progress.save_completion(&record).await.unwrap();

    let mut achievements = AchievementRecord::default();
    achievements.unlock(&ACHIEVEMENTS[4]);
    storage
        .progress
        .save_achievements(&achievements)
        .await
        .unwrap();

    let loaded = storage.progress.load_completion().await.unwrap();
    assert_eq!(loaded.completed_count(), 1);
    assert_eq!(loaded.score_for(&PuzzleId::new("2")), 650);
    assert!(storage
        .progress
        .load_achievements()
        .await
        .unwrap()
        .is_unlocked("puzzle_master"));

    let raw = storage.kv.get(keys::COMPLETED_PUZZLES).await.unwrap();
    assert_eq!(raw.as_deref(), Some(r#"["2"]"#));
}

#[tokio::test]
async fn sqlite_tolerates_malformed_progress() {
    let storage = Storage::sqlite("sqlite:file:memdb_malformed?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .kv
        .set(keys::PUZZLE_SCORES, "{\"1\": \"lots\"}")
        .await
        .unwrap();
    let record = storage.progress.load_completion().await.unwrap();
    assert_eq!(record.score_for(&PuzzleId::new("1")), 0);
}
