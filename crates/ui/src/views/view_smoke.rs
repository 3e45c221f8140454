use std::sync::Arc;

use async_trait::async_trait;
use puzzle_core::model::{AchievementRecord, CompletionRecord, PuzzleId};
use services::PuzzleInput;
use storage::repository::{ProgressRepository, Storage, StorageError};
use tokio::sync::Notify;

use super::test_harness::{
    ViewHarness, ViewKind, setup_view_harness, setup_view_harness_with, test_catalog,
};

/// Parks every completion write until `release` is notified.
struct HeldCompletionWrites {
    inner: Arc<dyn ProgressRepository>,
    release: Notify,
}

#[async_trait]
impl ProgressRepository for HeldCompletionWrites {
    async fn load_completion(&self) -> Result<CompletionRecord, StorageError> {
        self.inner.load_completion().await
    }

    async fn save_completion(&self, record: &CompletionRecord) -> Result<(), StorageError> {
        self.release.notified().await;
        self.inner.save_completion(record).await
    }

    async fn load_achievements(&self) -> Result<AchievementRecord, StorageError> {
        self.inner.load_achievements().await
    }

    async fn save_achievements(&self, record: &AchievementRecord) -> Result<(), StorageError> {
        self.inner.save_achievements(record).await
    }

    async fn has_visited(&self) -> Result<bool, StorageError> {
        self.inner.has_visited().await
    }

    async fn mark_visited(&self) -> Result<(), StorageError> {
        self.inner.mark_visited().await
    }

    async fn reset(&self) -> Result<(), StorageError> {
        self.inner.reset().await
    }
}

fn type_answer(harness: &ViewHarness, text: &str) {
    let dispatch = harness.play_handles.dispatch();
    harness.dom.in_runtime(|| {
        for ch in text.chars() {
            dispatch.call(PuzzleInput::Letter(ch));
        }
    });
}

fn send(harness: &ViewHarness, input: PuzzleInput) {
    let dispatch = harness.play_handles.dispatch();
    harness.dom.in_runtime(|| dispatch.call(input));
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_renders_requested_puzzle() {
    let mut harness = setup_view_harness(ViewKind::Play("2".into()));
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Puzzle #2"), "missing title in {html}");
    assert!(html.contains("img/new-york.jpg"), "missing image in {html}");
    assert!(html.contains("Attempts: 0"), "missing attempts in {html}");
    assert!(html.contains("Points: 1000"), "missing points in {html}");
    assert!(html.contains("Time: 0:00"), "missing timer in {html}");
    assert_eq!(html.matches("letter-cell--empty").count(), 7, "{html}");
    assert!(html.contains("How to play"), "missing tutorial in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_solves_and_celebrates() {
    let mut harness = setup_view_harness(ViewKind::Play("2".into()));
    harness.settle().await;

    type_answer(&harness, "newyork");
    harness.drive_async().await;
    let html = harness.render();
    assert!(!html.contains("letter-cell--empty"), "grid not filled in {html}");

    send(&harness, PuzzleInput::Submit);
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(
        html.contains("Correct! You earned 950 points!"),
        "missing success feedback in {html}"
    );
    assert!(html.contains("Unlocked: Speed Demon"), "missing badge in {html}");
    assert!(html.contains("Next Puzzle"), "missing next action in {html}");

    let record = harness.storage.progress.load_completion().await.unwrap();
    assert_eq!(record.score_for(&PuzzleId::new("2")), 950);
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_keeps_page_while_saving() {
    let base = Storage::in_memory();
    let held = Arc::new(HeldCompletionWrites {
        inner: Arc::clone(&base.progress),
        release: Notify::new(),
    });
    let storage = Storage {
        kv: Arc::clone(&base.kv),
        progress: held.clone(),
    };
    let mut harness =
        setup_view_harness_with(ViewKind::Play("2".into()), storage, Some(test_catalog()));
    harness.settle().await;

    type_answer(&harness, "newyork");
    send(&harness, PuzzleInput::Submit);
    harness.drive_async().await;
    send(&harness, PuzzleInput::Backspace);
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Puzzle #2"), "page blanked while saving: {html}");
    assert!(!html.contains("letter-cell--empty"), "grid lost while saving: {html}");
    assert!(!html.contains("Correct!"), "solved before the save finished: {html}");

    held.release.notify_one();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("Correct! You earned 950 points!"),
        "missing success feedback in {html}"
    );
    // The backspace queued during the save reaches a locked puzzle and is ignored.
    assert!(!html.contains("letter-cell--empty"), "solved grid edited: {html}");

    let record = base.progress.load_completion().await.unwrap();
    assert_eq!(record.score_for(&PuzzleId::new("2")), 950);
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_reports_wrong_answer() {
    let mut harness = setup_view_harness(ViewKind::Play("1".into()));
    harness.settle().await;

    type_answer(&harness, "london");
    send(&harness, PuzzleInput::Submit);
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(
        html.contains("Incorrect answer, try again!"),
        "missing failure feedback in {html}"
    );
    assert!(html.contains("Attempts: 1"), "missing attempts in {html}");
    assert_eq!(html.matches("letter-cell--empty").count(), 5, "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_hint_reveals_first_letter() {
    let mut harness = setup_view_harness(ViewKind::Play("10".into()));
    harness.settle().await;

    send(&harness, PuzzleInput::Hint);
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("letter-cell--revealed"), "missing reveal in {html}");
    assert!(html.contains("Points: 950"), "missing deduction in {html}");
    let vm = harness.play_handles.vm();
    let snapshot = harness
        .dom
        .in_runtime(|| vm.peek().as_ref().map(crate::vm::PlayVm::snapshot));
    let snapshot = snapshot.expect("vm loaded");
    assert_eq!(snapshot.words[0].cells[0].display, 'R');
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_all_completed() {
    let storage = Storage::in_memory();
    let mut record = CompletionRecord::default();
    for id in ["1", "2", "10"] {
        record.record(PuzzleId::new(id), 500);
    }
    storage.progress.save_completion(&record).await.unwrap();

    let mut harness =
        setup_view_harness_with(ViewKind::Play(String::new()), storage, Some(test_catalog()));
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Congratulations! You&#39;ve completed all puzzles!")
            || html.contains("Congratulations! You've completed all puzzles!"),
        "missing completion message in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_catalog_failure() {
    let mut harness =
        setup_view_harness_with(ViewKind::Play(String::new()), Storage::in_memory(), None);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Error loading puzzles"), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn play_view_smoke_unknown_puzzle() {
    let mut harness = setup_view_harness(ViewKind::Play("404".into()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("That puzzle does not exist."), "missing error in {html}");
    assert!(html.contains("Browse puzzles"), "missing link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn puzzles_view_smoke_lists_cards_and_achievements() {
    let storage = Storage::in_memory();
    let mut record = CompletionRecord::default();
    record.record(PuzzleId::new("2"), 850);
    storage.progress.save_completion(&record).await.unwrap();

    let mut harness = setup_view_harness_with(
        ViewKind::Puzzles,
        storage,
        Some(test_catalog()),
    );
    harness.settle().await;
    let html = harness.render();

    let first = html.find("Puzzle #1").expect("puzzle 1 listed");
    let second = html.find("Puzzle #2").expect("puzzle 2 listed");
    let tenth = html.find("Puzzle #10").expect("puzzle 10 listed");
    assert!(first < second && second < tenth, "cards out of order in {html}");
    assert!(html.contains("Score: 850"), "missing score in {html}");
    assert_eq!(html.matches("Completed").count(), 1, "{html}");
    assert!(html.contains("Total score: 850"), "missing total in {html}");
    assert!(html.contains("Puzzle Master"), "missing achievements in {html}");
    assert!(html.contains("achievement-platinum"), "missing tier class in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn puzzles_view_smoke_catalog_failure() {
    let mut harness = setup_view_harness_with(ViewKind::Puzzles, Storage::in_memory(), None);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Error loading puzzles"), "missing error in {html}");
}
