use chrono::{DateTime, Utc};
use puzzle_core::model::{
    BASE_SCORE, CellPos, HINT_PENALTY, LetterCell, LetterGrid, Puzzle, ScoreInputs,
};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── HINT OUTCOME ──────────────────────────────────────────────────────────────
//

/// What a hint request did to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintOutcome {
    /// The first letter of a word was revealed.
    WordRevealed(CellPos),
    /// A single non-first letter was revealed.
    LetterRevealed(CellPos),
    /// Every word and every letter has already been given away.
    Exhausted,
    /// The puzzle is solved; hints no longer apply.
    Locked,
}

impl HintOutcome {
    #[must_use]
    pub fn applied(self) -> bool {
        matches!(self, Self::WordRevealed(_) | Self::LetterRevealed(_))
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at one puzzle: the letter grid plus attempt and hint counters.
///
/// A session is created when a puzzle is loaded and replaced on the next load.
/// Once solved it is locked and ignores input until discarded.
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    puzzle: Puzzle,
    grid: LetterGrid,
    started_at: DateTime<Utc>,
    attempts: u32,
    live_points: u32,
    completed_at: Option<DateTime<Utc>>,
}

impl PuzzleSession {
    /// `started_at` should come from the services layer clock.
    #[must_use]
    pub fn new(puzzle: Puzzle, started_at: DateTime<Utc>) -> Self {
        let grid = LetterGrid::new(puzzle.answer());
        Self {
            puzzle,
            grid,
            started_at,
            attempts: 0,
            live_points: BASE_SCORE,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    #[must_use]
    pub fn grid(&self) -> &LetterGrid {
        &self.grid
    }

    /// Fresh cell snapshot for rendering.
    #[must_use]
    pub fn cells(&self) -> Vec<LetterCell> {
        self.grid.cells()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn hints_used(&self) -> u32 {
        u32::try_from(self.grid.hints_used()).unwrap_or(u32::MAX)
    }

    /// Display-only counter: starts at the base score, loses one penalty per hint.
    #[must_use]
    pub fn live_points(&self) -> u32 {
        self.live_points
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let cells = self.grid.cells();
        SessionProgress {
            letters: cells.len(),
            filled: cells.iter().filter(|cell| !cell.is_empty()).count(),
            attempts: self.attempts,
            hints_used: self.hints_used(),
            live_points: self.live_points,
            is_locked: self.is_locked(),
        }
    }

    /// Inputs for the final score given the elapsed solve time.
    #[must_use]
    pub fn score_inputs(&self, elapsed_secs: u64) -> ScoreInputs {
        ScoreInputs {
            elapsed_secs,
            attempts: self.attempts,
            hints: self.hints_used(),
        }
    }

    // ─── Input ────────────────────────────────────────────────────────────────

    /// Returns `true` when a letter was written.
    pub fn input_letter(&mut self, ch: char) -> bool {
        !self.is_locked() && self.grid.input_letter(ch)
    }

    pub fn backspace(&mut self) {
        if !self.is_locked() {
            self.grid.backspace();
        }
    }

    pub fn advance_word(&mut self) {
        if !self.is_locked() {
            self.grid.advance_word();
        }
    }

    /// Returns `true` when the cursor moved to `pos`.
    pub fn select_cell(&mut self, pos: CellPos) -> bool {
        !self.is_locked() && self.grid.select(pos)
    }

    /// Count an attempt and check the grid against the answer.
    ///
    /// A wrong guess clears every open cell and puts the cursor on the first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is already solved.
    pub fn submit(&mut self) -> Result<bool, SessionError> {
        if self.is_locked() {
            return Err(SessionError::Completed);
        }
        self.attempts = self.attempts.saturating_add(1);
        let correct = self.puzzle.answer().matches(&self.grid.guess());
        if !correct {
            self.grid.clear_open();
        }
        Ok(correct)
    }

    /// Fill in the solution and lock the session.
    pub fn complete(&mut self, completed_at: DateTime<Utc>) {
        self.grid.fill_solution();
        self.completed_at = Some(completed_at);
    }

    // ─── Hints ────────────────────────────────────────────────────────────────

    /// Reveal the next word's first letter, or a random hidden letter once every
    /// word has been started.
    pub fn reveal_hint<R>(&mut self, rng: &mut R) -> HintOutcome
    where
        R: Rng + ?Sized,
    {
        if self.is_locked() {
            return HintOutcome::Locked;
        }

        let outcome = if let Some(pos) = self.grid.reveal_next_word() {
            HintOutcome::WordRevealed(pos)
        } else {
            let candidates = self.grid.letter_hint_candidates();
            match candidates.choose(rng).copied() {
                Some(pos) if self.grid.reveal_letter(pos) => HintOutcome::LetterRevealed(pos),
                _ => HintOutcome::Exhausted,
            }
        };

        if outcome.applied() {
            self.live_points = self.live_points.saturating_sub(HINT_PENALTY);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::model::PuzzleId;
    use puzzle_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(answer: &str) -> PuzzleSession {
        let puzzle = Puzzle::new(PuzzleId::new("7"), "7.jpg", answer).unwrap();
        PuzzleSession::new(puzzle, fixed_now())
    }

    fn type_str(session: &mut PuzzleSession, text: &str) {
        for ch in text.chars() {
            session.input_letter(ch);
        }
    }

    #[test]
    fn new_session_is_blank_and_unlocked() {
        let session = session("NEW YORK");
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.hints_used(), 0);
        assert_eq!(session.live_points(), 1000);
        assert!(!session.is_locked());
        assert!(session.cells().iter().all(LetterCell::is_empty));
        assert_eq!(session.cells().len(), 7);
    }

    #[test]
    fn correct_submission_counts_attempt() {
        let mut session = session("NEW YORK");
        type_str(&mut session, "newyork");
        assert!(session.submit().unwrap());
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn wrong_submission_clears_open_cells() {
        let mut session = session("NEW YORK");
        type_str(&mut session, "NEWYORC");
        assert!(!session.submit().unwrap());
        assert_eq!(session.attempts(), 1);
        assert_eq!(session.grid().guess(), "_______");
        assert_eq!(session.grid().active(), Some(CellPos::new(0, 0)));
    }

    #[test]
    fn partial_grid_never_matches() {
        let mut session = session("NEW YORK");
        type_str(&mut session, "NEWYOR");
        assert!(!session.submit().unwrap());
    }

    #[test]
    fn word_hints_come_before_letter_hints() {
        let mut session = session("NEW YORK");
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(
            session.reveal_hint(&mut rng),
            HintOutcome::WordRevealed(CellPos::new(0, 0))
        );
        assert_eq!(
            session.reveal_hint(&mut rng),
            HintOutcome::WordRevealed(CellPos::new(1, 0))
        );
        let third = session.reveal_hint(&mut rng);
        let HintOutcome::LetterRevealed(pos) = third else {
            panic!("expected a letter hint, got {third:?}");
        };
        assert!(pos.letter > 0);
        assert_eq!(session.hints_used(), 3);
        assert_eq!(session.live_points(), 850);
    }

    #[test]
    fn hints_run_out() {
        let mut session = session("AB");
        let mut rng = StdRng::seed_from_u64(1);
        assert!(session.reveal_hint(&mut rng).applied());
        assert_eq!(
            session.reveal_hint(&mut rng),
            HintOutcome::LetterRevealed(CellPos::new(0, 1))
        );
        assert_eq!(session.reveal_hint(&mut rng), HintOutcome::Exhausted);
        assert_eq!(session.hints_used(), 2);
        assert_eq!(session.live_points(), 900);
        assert_eq!(session.grid().guess(), "AB");
    }

    #[test]
    fn live_points_floor_at_zero() {
        let long = "ABCDEFGHIJKLMNOPQRSTUVWXY";
        let mut session = session(long);
        let mut rng = StdRng::seed_from_u64(3);
        while session.reveal_hint(&mut rng).applied() {}
        assert_eq!(session.hints_used(), 25);
        assert_eq!(session.live_points(), 0);
    }

    #[test]
    fn locked_session_ignores_everything() {
        let mut session = session("NEW YORK");
        type_str(&mut session, "NEWYORK");
        assert!(session.submit().unwrap());
        session.complete(fixed_now());

        assert!(session.is_locked());
        assert!(!session.input_letter('A'));
        session.backspace();
        assert_eq!(session.grid().guess(), "NEWYORK");
        assert!(!session.select_cell(CellPos::new(0, 1)));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(session.reveal_hint(&mut rng), HintOutcome::Locked);
        assert!(matches!(session.submit(), Err(SessionError::Completed)));
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn progress_reflects_grid() {
        let mut session = session("NEW YORK");
        type_str(&mut session, "NEW");
        let progress = session.progress();
        assert_eq!(progress.letters, 7);
        assert_eq!(progress.filled, 3);
        assert!(!progress.is_locked);
    }

    #[test]
    fn score_inputs_include_all_hints() {
        let mut session = session("NEW YORK");
        let mut rng = StdRng::seed_from_u64(9);
        session.reveal_hint(&mut rng);
        session.reveal_hint(&mut rng);
        session.reveal_hint(&mut rng);
        let inputs = session.score_inputs(25);
        assert_eq!(inputs.hints, 3);
        assert_eq!(inputs.elapsed_secs, 25);
    }
}
