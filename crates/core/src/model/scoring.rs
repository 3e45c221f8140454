//! Point score for a solved puzzle.

/// Score of a flawless solve.
pub const BASE_SCORE: u32 = 1000;
/// Lowest score a solve can earn.
pub const MIN_SCORE: u32 = 100;
/// Points lost per full ten seconds, per attempt and per hint.
pub const HINT_PENALTY: u32 = 50;

const TIME_STEP_SECS: u64 = 10;

/// Everything the final score depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreInputs {
    pub elapsed_secs: u64,
    pub attempts: u32,
    /// Whole-word hints plus individually revealed letters.
    pub hints: u32,
}

/// `max(100, 1000 - 50*floor(t/10) - 50*attempts - 50*hints)`.
#[must_use]
pub fn compute_score(inputs: ScoreInputs) -> u32 {
    let penalty = i128::from(HINT_PENALTY);
    let deductions = penalty * i128::from(inputs.elapsed_secs / TIME_STEP_SECS)
        + penalty * i128::from(inputs.attempts)
        + penalty * i128::from(inputs.hints);
    let raw = i128::from(BASE_SCORE) - deductions;
    let floored = raw.max(i128::from(MIN_SCORE));
    u32::try_from(floored).unwrap_or(MIN_SCORE)
}
