use std::collections::BTreeMap;

use crate::model::PuzzleId;

/// Solved puzzles and the score earned on each.
///
/// Membership is set-like: recording the same puzzle twice keeps one entry in
/// `completed`. The score, however, is overwritten by every recording, so a
/// replayed puzzle keeps its latest score rather than its best.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionRecord {
    completed: Vec<PuzzleId>,
    scores: BTreeMap<PuzzleId, u32>,
}

impl CompletionRecord {
    /// Rebuild a record from its two persisted halves, dropping duplicate ids.
    #[must_use]
    pub fn from_parts(completed: Vec<PuzzleId>, scores: BTreeMap<PuzzleId, u32>) -> Self {
        let mut record = Self {
            completed: Vec::with_capacity(completed.len()),
            scores,
        };
        for id in completed {
            if !record.completed.contains(&id) {
                record.completed.push(id);
            }
        }
        record
    }

    /// Mark `id` completed with `score`.
    ///
    /// Returns `true` if the puzzle was not completed before.
    pub fn record(&mut self, id: PuzzleId, score: u32) -> bool {
        let first_time = !self.is_completed(&id);
        if first_time {
            self.completed.push(id.clone());
        }
        self.scores.insert(id, score);
        first_time
    }

    #[must_use]
    pub fn is_completed(&self, id: &PuzzleId) -> bool {
        self.completed.contains(id)
    }

    /// Persisted score, or 0 when the puzzle has none.
    #[must_use]
    pub fn score_for(&self, id: &PuzzleId) -> u32 {
        self.scores.get(id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn completed(&self) -> &[PuzzleId] {
        &self.completed
    }

    #[must_use]
    pub fn scores(&self) -> &BTreeMap<PuzzleId, u32> {
        &self.scores
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Sum of the scores of completed puzzles.
    #[must_use]
    pub fn total_score(&self) -> u64 {
        self.completed
            .iter()
            .map(|id| u64::from(self.score_for(id)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_twice_keeps_single_membership() {
        let mut record = CompletionRecord::default();
        assert!(record.record(PuzzleId::new("4"), 900));
        assert!(!record.record(PuzzleId::new("4"), 300));
        assert_eq!(record.completed_count(), 1);
    }

    #[test]
    fn rerecording_overwrites_score() {
        let mut record = CompletionRecord::default();
        record.record(PuzzleId::new("4"), 900);
        record.record(PuzzleId::new("4"), 300);
        assert_eq!(record.score_for(&PuzzleId::new("4")), 300);
    }

    #[test]
    fn missing_score_reads_as_zero() {
        let record = CompletionRecord::default();
        assert_eq!(record.score_for(&PuzzleId::new("1")), 0);
    }

    #[test]
    fn from_parts_drops_duplicates() {
        let record = CompletionRecord::from_parts(
            vec![PuzzleId::new("1"), PuzzleId::new("2"), PuzzleId::new("1")],
            BTreeMap::from([(PuzzleId::new("1"), 400), (PuzzleId::new("2"), 600)]),
        );
        assert_eq!(record.completed_count(), 2);
        assert_eq!(record.total_score(), 1000);
    }
}
