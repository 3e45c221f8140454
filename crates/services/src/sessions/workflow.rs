use std::sync::Arc;

use puzzle_core::model::{
    AchievementDef, Catalog, CellPos, CompletionContext, CompletionRecord, PuzzleId, ScoreInputs,
    compute_score, evaluate_achievements,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::repository::ProgressRepository;

use super::selection::{NavState, SelectionOutcome, pick_random_uncompleted};
use super::service::{HintOutcome, PuzzleSession};
use super::ticker::{ElapsedTicker, TickerGeneration, format_elapsed};
use crate::Clock;
use crate::catalog_service::LoadedCatalog;
use crate::error::SessionError;

/// Player-facing texts emitted by the controller.
pub mod messages {
    pub const CATALOG_FAILED: &str = "Error loading puzzles";
    pub const ALL_COMPLETED: &str = "Congratulations! You've completed all puzzles!";
    pub const INCORRECT: &str = "Incorrect answer, try again!";
    pub const NO_MORE_HINTS: &str = "No more hints available!";
    pub const LOADING: &str = "Loading...";
    pub const SAVE_FAILED: &str = "Your progress could not be saved. Submit again to retry.";

    #[must_use]
    pub fn correct(score: u32) -> String {
        format!("Correct! You earned {score} points!")
    }
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    /// Waiting for the catalog.
    Loading,
    /// Catalog ready, no puzzle chosen yet.
    Unloaded,
    /// A puzzle is accepting input.
    Active,
    /// The current puzzle is solved; only loading another one leaves this phase.
    Locked,
    AllCompleted,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Danger,
    Info,
}

/// Banner text shown under the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    fn new(kind: FeedbackKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Everything known about a successful solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSummary {
    pub puzzle_id: PuzzleId,
    pub score: u32,
    pub elapsed_secs: u64,
    pub attempts: u32,
    pub hints: u32,
    /// Achievements unlocked by this solve, in definition order.
    pub unlocked: Vec<&'static AchievementDef>,
    /// Whether any uncompleted puzzle remains after this one.
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Incorrect { attempts: u32 },
    Correct(CompletionSummary),
}

/// Keyboard-level input, dispatched through [`PuzzleController::handle_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleInput {
    Letter(char),
    Backspace,
    AdvanceWord,
    Submit,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Nothing is loaded or the puzzle is locked.
    Ignored,
    /// The grid changed.
    Updated,
    Submitted(SubmitOutcome),
    Hint(HintOutcome),
}

enum CatalogState {
    Pending,
    Ready(LoadedCatalog),
    Failed,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns the puzzle session and drives it from catalog load to completion.
///
/// The controller is the sole writer of progress: it reads the completion
/// record when choosing puzzles and writes it, together with newly unlocked
/// achievements, when a puzzle is solved.
pub struct PuzzleController {
    clock: Clock,
    rng: StdRng,
    progress: Arc<dyn ProgressRepository>,
    catalog: CatalogState,
    phase: ControllerPhase,
    session: Option<PuzzleSession>,
    ticker: ElapsedTicker,
    feedback: Option<Feedback>,
    last_completion: Option<CompletionSummary>,
}

impl PuzzleController {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self {
            clock,
            rng: StdRng::from_os_rng(),
            progress,
            catalog: CatalogState::Pending,
            phase: ControllerPhase::Loading,
            session: None,
            ticker: ElapsedTicker::default(),
            feedback: None,
            last_completion: None,
        }
    }

    /// Use a deterministic random source for puzzle selection and letter hints.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Hand the result of the one catalog fetch to the controller.
    ///
    /// `None` means the fetch failed; the controller enters its terminal
    /// `Failed` phase.
    pub fn attach_catalog(&mut self, catalog: Option<LoadedCatalog>) {
        match catalog {
            Some(loaded) => {
                tracing::debug!(puzzles = loaded.catalog().len(), "catalog attached");
                self.catalog = CatalogState::Ready(loaded);
                self.phase = ControllerPhase::Unloaded;
                self.feedback = None;
            }
            None => self.fail_catalog(),
        }
    }

    // ─── Accessors ────────────────────────────────────────────────────────────

    #[must_use]
    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    #[must_use]
    pub fn session(&self) -> Option<&PuzzleSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> Option<&LoadedCatalog> {
        match &self.catalog {
            CatalogState::Ready(loaded) => Some(loaded),
            CatalogState::Pending | CatalogState::Failed => None,
        }
    }

    #[must_use]
    pub fn current_puzzle_id(&self) -> Option<&PuzzleId> {
        self.session.as_ref().map(|session| session.puzzle().id())
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn last_completion(&self) -> Option<&CompletionSummary> {
        self.last_completion.as_ref()
    }

    /// True after a solve that left at least one uncompleted puzzle.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.last_completion
            .as_ref()
            .is_some_and(|summary| summary.has_next)
    }

    /// Puzzle title, or the status text that replaces it.
    #[must_use]
    pub fn title(&self) -> String {
        match self.phase {
            ControllerPhase::Failed => messages::CATALOG_FAILED.to_string(),
            ControllerPhase::AllCompleted => messages::ALL_COMPLETED.to_string(),
            ControllerPhase::Loading | ControllerPhase::Unloaded => messages::LOADING.to_string(),
            ControllerPhase::Active | ControllerPhase::Locked => self
                .session
                .as_ref()
                .map_or_else(|| messages::LOADING.to_string(), |s| s.puzzle().title()),
        }
    }

    /// Image source for the current puzzle, resolved against the catalog.
    #[must_use]
    pub fn image_src(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        Some(self.catalog()?.image_src(session.puzzle()))
    }

    /// Seconds spent on the current puzzle, frozen once it is solved.
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        let Some(session) = &self.session else {
            return 0;
        };
        match session.completed_at() {
            Some(done) => u64::try_from((done - session.started_at()).num_seconds()).unwrap_or(0),
            None => self.clock.elapsed_secs_since(session.started_at()),
        }
    }

    #[must_use]
    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed_secs())
    }

    /// Generation of the running elapsed-time ticker.
    #[must_use]
    pub fn ticker(&self) -> TickerGeneration {
        self.ticker.current()
    }

    /// Formatted elapsed time, or `None` once `generation` is stale or stopped.
    #[must_use]
    pub fn tick(&self, generation: TickerGeneration) -> Option<String> {
        if !self.ticker.is_live(generation) || self.session.is_none() {
            return None;
        }
        Some(self.elapsed_display())
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    // ─── Loading ──────────────────────────────────────────────────────────────

    /// Start a fresh session on `id`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CatalogUnavailable` when the catalog is missing and
    /// `SessionError::UnknownPuzzle` when `id` is not in it.
    pub fn load_puzzle(&mut self, id: &PuzzleId) -> Result<TickerGeneration, SessionError> {
        let puzzle = match &self.catalog {
            CatalogState::Ready(loaded) => loaded
                .catalog()
                .get(id)
                .cloned()
                .ok_or_else(|| SessionError::UnknownPuzzle(id.clone()))?,
            CatalogState::Failed => {
                tracing::error!(puzzle_id = %id, "cannot load puzzle without a catalog");
                self.fail_catalog();
                return Err(SessionError::CatalogUnavailable);
            }
            CatalogState::Pending => return Err(SessionError::CatalogUnavailable),
        };

        self.session = Some(PuzzleSession::new(puzzle, self.clock.now()));
        self.phase = ControllerPhase::Active;
        self.feedback = None;
        self.last_completion = None;
        let generation = self.ticker.restart();
        tracing::debug!(puzzle_id = %id, ticker = generation.value(), "puzzle loaded");
        Ok(generation)
    }

    /// Load the puzzle named in `nav`, or a random uncompleted one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the catalog is unavailable, the explicit id is
    /// unknown, or progress cannot be read.
    pub async fn select_initial_puzzle(
        &mut self,
        nav: &NavState,
    ) -> Result<SelectionOutcome, SessionError> {
        if let Some(id) = &nav.puzzle_id {
            self.load_puzzle(id)?;
            return Ok(SelectionOutcome::Loaded(id.clone()));
        }

        self.ready_catalog()?;
        let record = self.progress.load_completion().await?;
        let picked = match &self.catalog {
            CatalogState::Ready(loaded) => {
                pick_random_uncompleted(loaded.catalog(), &record, &mut self.rng)
            }
            CatalogState::Pending | CatalogState::Failed => {
                return Err(SessionError::CatalogUnavailable);
            }
        };
        self.load_or_finish(picked)
    }

    /// Load the first uncompleted puzzle after the current one, wrapping around.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPuzzleLoaded` without a current puzzle, and
    /// storage or catalog errors otherwise.
    pub async fn advance_to_next_puzzle(&mut self) -> Result<SelectionOutcome, SessionError> {
        let current = self
            .current_puzzle_id()
            .cloned()
            .ok_or(SessionError::NoPuzzleLoaded)?;
        let record = self.progress.load_completion().await?;
        let next = self
            .ready_catalog()?
            .next_uncompleted_after(&current, &record)
            .map(|puzzle| puzzle.id().clone());
        self.load_or_finish(next)
    }

    // ─── Input ────────────────────────────────────────────────────────────────

    /// Returns `true` when a letter was written.
    pub fn handle_letter_input(&mut self, ch: char) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.input_letter(ch))
    }

    pub fn handle_backspace(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.backspace();
        }
    }

    pub fn handle_advance_word(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.advance_word();
        }
    }

    /// Put the cursor on a clicked cell. Revealed cells are ignored.
    pub fn select_cell(&mut self, word: usize, letter: usize) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.select_cell(CellPos::new(word, letter)))
    }

    /// Check the grid against the answer and, on success, score and persist it.
    ///
    /// The session is locked only once the completion and any new achievements
    /// are stored. A failed save leaves the puzzle open so it can be submitted
    /// again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPuzzleLoaded` or `SessionError::Completed` when
    /// there is nothing to submit, and storage errors from persisting progress.
    pub async fn submit_answer(&mut self) -> Result<SubmitOutcome, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoPuzzleLoaded)?;
        if !session.submit()? {
            let attempts = session.attempts();
            tracing::debug!(puzzle_id = %session.puzzle().id(), attempts, "incorrect answer");
            self.feedback = Some(Feedback::new(FeedbackKind::Danger, messages::INCORRECT));
            return Ok(SubmitOutcome::Incorrect { attempts });
        }

        let now = self.clock.now();
        let elapsed_secs = self.clock.elapsed_secs_since(session.started_at());
        let inputs = session.score_inputs(elapsed_secs);
        let score = compute_score(inputs);
        let puzzle_id = session.puzzle().id().clone();

        let persisted = self
            .persist_completion(&puzzle_id, score, elapsed_secs, inputs)
            .await;
        let (record, unlocked) = match persisted {
            Ok(persisted) => persisted,
            Err(err) => {
                tracing::error!(puzzle_id = %puzzle_id, error = %err, "could not save completion");
                self.feedback = Some(Feedback::new(FeedbackKind::Danger, messages::SAVE_FAILED));
                return Err(err);
            }
        };

        self.ticker.stop();
        if let Some(session) = self.session.as_mut() {
            session.complete(now);
        }
        self.phase = ControllerPhase::Locked;
        let has_next = self
            .catalog()
            .is_some_and(|loaded| !loaded.catalog().uncompleted(&record).is_empty());

        tracing::info!(
            puzzle_id = %puzzle_id,
            score,
            elapsed_secs,
            attempts = inputs.attempts,
            hints = inputs.hints,
            "puzzle solved"
        );
        for def in &unlocked {
            tracing::info!(achievement = def.id, tier = def.tier.display_name(), "achievement unlocked");
        }

        let summary = CompletionSummary {
            puzzle_id,
            score,
            elapsed_secs,
            attempts: inputs.attempts,
            hints: inputs.hints,
            unlocked,
            has_next,
        };
        self.feedback = Some(Feedback::new(FeedbackKind::Success, messages::correct(score)));
        self.last_completion = Some(summary.clone());
        Ok(SubmitOutcome::Correct(summary))
    }

    /// Give away the next word start, or a random hidden letter.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPuzzleLoaded` when nothing is loaded.
    pub fn reveal_hint(&mut self) -> Result<HintOutcome, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoPuzzleLoaded)?;
        let outcome = session.reveal_hint(&mut self.rng);
        match outcome {
            HintOutcome::WordRevealed(pos) | HintOutcome::LetterRevealed(pos) => {
                tracing::debug!(word = pos.word, letter = pos.letter, "hint revealed");
                self.feedback = None;
            }
            HintOutcome::Exhausted => {
                self.feedback = Some(Feedback::new(FeedbackKind::Info, messages::NO_MORE_HINTS));
            }
            HintOutcome::Locked => {}
        }
        Ok(outcome)
    }

    /// Dispatch one keyboard-level input.
    ///
    /// # Errors
    ///
    /// Propagates storage errors from a successful submission.
    pub async fn handle_input(&mut self, input: PuzzleInput) -> Result<InputOutcome, SessionError> {
        if self.phase != ControllerPhase::Active {
            return Ok(InputOutcome::Ignored);
        }
        let outcome = match input {
            PuzzleInput::Letter(ch) => {
                if self.handle_letter_input(ch) {
                    InputOutcome::Updated
                } else {
                    InputOutcome::Ignored
                }
            }
            PuzzleInput::Backspace => {
                self.handle_backspace();
                InputOutcome::Updated
            }
            PuzzleInput::AdvanceWord => {
                self.handle_advance_word();
                InputOutcome::Updated
            }
            PuzzleInput::Submit => InputOutcome::Submitted(self.submit_answer().await?),
            PuzzleInput::Hint => InputOutcome::Hint(self.reveal_hint()?),
        };
        Ok(outcome)
    }

    // ─── Helpers ──────────────────────────────────────────────────────────────

    /// Store the completion, then the achievements it unlocks. Achievements are
    /// judged against the record as it was before this solve.
    async fn persist_completion(
        &self,
        puzzle_id: &PuzzleId,
        score: u32,
        elapsed_secs: u64,
        inputs: ScoreInputs,
    ) -> Result<(CompletionRecord, Vec<&'static AchievementDef>), SessionError> {
        let mut record = self.progress.load_completion().await?;
        let mut achievements = self.progress.load_achievements().await?;
        let ctx = CompletionContext {
            elapsed_secs,
            attempts: inputs.attempts,
            hints: inputs.hints,
            score,
            completed_before: record.completed_count(),
        };
        let unlocked: Vec<&'static AchievementDef> = evaluate_achievements(&ctx)
            .into_iter()
            .filter(|def| achievements.unlock(def))
            .collect();

        record.record(puzzle_id.clone(), score);
        self.progress.save_completion(&record).await?;
        if !unlocked.is_empty() {
            self.progress.save_achievements(&achievements).await?;
        }
        Ok((record, unlocked))
    }

    fn ready_catalog(&self) -> Result<&Catalog, SessionError> {
        match &self.catalog {
            CatalogState::Ready(loaded) => Ok(loaded.catalog()),
            CatalogState::Pending | CatalogState::Failed => Err(SessionError::CatalogUnavailable),
        }
    }

    fn load_or_finish(
        &mut self,
        next: Option<PuzzleId>,
    ) -> Result<SelectionOutcome, SessionError> {
        match next {
            Some(id) => {
                self.load_puzzle(&id)?;
                Ok(SelectionOutcome::Loaded(id))
            }
            None => {
                self.finish_all();
                Ok(SelectionOutcome::AllCompleted)
            }
        }
    }

    fn finish_all(&mut self) {
        tracing::info!("all puzzles completed");
        self.session = None;
        self.ticker.stop();
        self.phase = ControllerPhase::AllCompleted;
        self.last_completion = None;
        self.feedback = Some(Feedback::new(FeedbackKind::Success, messages::ALL_COMPLETED));
    }

    fn fail_catalog(&mut self) {
        self.catalog = CatalogState::Failed;
        self.session = None;
        self.ticker.stop();
        self.phase = ControllerPhase::Failed;
        self.feedback = Some(Feedback::new(FeedbackKind::Danger, messages::CATALOG_FAILED));
    }
}
