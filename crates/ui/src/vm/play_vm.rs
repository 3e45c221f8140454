use dioxus::prelude::Key;
use services::{
    CompletionSummary, ControllerPhase, FeedbackKind, NavState, PuzzleController, PuzzleInput,
    PuzzleSession, SelectionOutcome, SessionError, TickerGeneration,
};

use crate::vm::{WordVm, map_grid};
use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub class: &'static str,
    pub message: String,
}

/// Shown after a solve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CelebrationVm {
    pub score: u32,
    /// `(name, tier css class)` of each newly unlocked achievement.
    pub unlocked: Vec<(&'static str, &'static str)>,
}

impl From<&CompletionSummary> for CelebrationVm {
    fn from(summary: &CompletionSummary) -> Self {
        Self {
            score: summary.score,
            unlocked: summary
                .unlocked
                .iter()
                .map(|def| (def.name, def.tier.css_class()))
                .collect(),
        }
    }
}

/// Everything the play view renders, taken in one read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaySnapshot {
    pub title: String,
    pub image_src: Option<String>,
    pub words: Vec<WordVm>,
    pub attempts_label: String,
    pub points_label: String,
    pub time_label: String,
    pub feedback: Option<FeedbackVm>,
    pub celebration: Option<CelebrationVm>,
    pub has_next: bool,
    pub accepts_input: bool,
}

/// Something the player did on the play page, applied in arrival order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayAction {
    Input(PuzzleInput),
    Select { word: usize, letter: usize },
    Next,
}

pub struct PlayVm {
    controller: PuzzleController,
}

impl PlayVm {
    #[must_use]
    pub fn new(controller: PuzzleController) -> Self {
        Self { controller }
    }

    #[must_use]
    pub fn snapshot(&self) -> PlaySnapshot {
        let controller = &self.controller;
        let session = controller.session();
        let progress = session.map(PuzzleSession::progress);
        PlaySnapshot {
            title: controller.title(),
            image_src: controller.image_src(),
            words: session.map_or_else(Vec::new, |s| map_grid(&s.cells())),
            attempts_label: format!("Attempts: {}", progress.map_or(0, |p| p.attempts)),
            points_label: format!("Points: {}", progress.map_or(0, |p| p.live_points)),
            time_label: controller.elapsed_display(),
            feedback: controller.feedback().map(|feedback| FeedbackVm {
                class: match feedback.kind {
                    FeedbackKind::Success => "alert alert-success",
                    FeedbackKind::Danger => "alert alert-danger",
                    FeedbackKind::Info => "alert alert-info",
                },
                message: feedback.message.clone(),
            }),
            celebration: controller.last_completion().map(CelebrationVm::from),
            has_next: controller.has_next(),
            accepts_input: controller.phase() == ControllerPhase::Active,
        }
    }

    /// Ticker generation the view should follow, while a puzzle is being played.
    #[must_use]
    pub fn live_ticker(&self) -> Option<TickerGeneration> {
        (self.controller.phase() == ControllerPhase::Active).then(|| self.controller.ticker())
    }

    #[must_use]
    pub fn tick(&self, generation: TickerGeneration) -> Option<String> {
        self.controller.tick(generation)
    }

    /// Run one queued action against the controller.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` when the controller rejects the action for
    /// a reason other than a failed save.
    pub async fn perform(&mut self, action: PlayAction) -> Result<(), ViewError> {
        match action {
            PlayAction::Input(input) => self.handle_input(input).await,
            PlayAction::Select { word, letter } => {
                self.controller.select_cell(word, letter);
                Ok(())
            }
            PlayAction::Next => self.next_puzzle().await.map(|_| ()),
        }
    }

    async fn handle_input(&mut self, input: PuzzleInput) -> Result<(), ViewError> {
        match self.controller.handle_input(input).await {
            Ok(outcome) => {
                tracing::trace!(?input, ?outcome, "puzzle input handled");
                Ok(())
            }
            // The controller reports failed saves through its feedback banner.
            Err(SessionError::Storage(err)) => {
                tracing::error!(error = %err, "could not save progress");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, ?input, "puzzle input failed");
                Err(ViewError::Unknown)
            }
        }
    }

    async fn next_puzzle(&mut self) -> Result<SelectionOutcome, ViewError> {
        self.controller.advance_to_next_puzzle().await.map_err(|err| {
            tracing::error!(error = %err, "advance failed");
            ViewError::Unknown
        })
    }
}

/// Pick the first puzzle for a play view.
///
/// A missing catalog is not an error here: the controller renders its static
/// failure title instead.
///
/// # Errors
///
/// Returns `ViewError::UnknownPuzzle` for an explicit id that is not in the
/// catalog and `ViewError::Unknown` for storage failures.
pub async fn start_play(
    mut controller: PuzzleController,
    nav: NavState,
) -> Result<PlayVm, ViewError> {
    match controller.select_initial_puzzle(&nav).await {
        Ok(_) | Err(SessionError::CatalogUnavailable) => Ok(PlayVm::new(controller)),
        Err(SessionError::UnknownPuzzle(_)) => Err(ViewError::UnknownPuzzle),
        Err(err) => {
            tracing::error!(error = %err, "cannot start puzzle");
            Err(ViewError::Unknown)
        }
    }
}

/// Map a key press to a puzzle input.
#[must_use]
pub fn input_for_key(key: &Key) -> Option<PuzzleInput> {
    match key {
        Key::Backspace => Some(PuzzleInput::Backspace),
        Key::Enter => Some(PuzzleInput::Submit),
        Key::Tab => Some(PuzzleInput::AdvanceWord),
        Key::Character(value) => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(' '), None) => Some(PuzzleInput::AdvanceWord),
                (Some(ch), None) if ch.is_alphabetic() => Some(PuzzleInput::Letter(ch)),
                _ => None,
            }
        }
        _ => None,
    }
}
