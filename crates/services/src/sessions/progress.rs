/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub letters: usize,
    pub filled: usize,
    pub attempts: u32,
    pub hints_used: u32,
    pub live_points: u32,
    pub is_locked: bool,
}
