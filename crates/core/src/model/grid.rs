use std::collections::BTreeSet;

use crate::model::Answer;

/// Character shown in a cell that holds no letter yet.
pub const PLACEHOLDER: char = '_';

/// Location of a cell: which word, and which letter inside that word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub word: usize,
    pub letter: usize,
}

impl CellPos {
    #[must_use]
    pub const fn new(word: usize, letter: usize) -> Self {
        Self { word, letter }
    }
}

/// Render-time snapshot of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterCell {
    pub pos: CellPos,
    pub revealed: bool,
    pub display: char,
    pub word_start: bool,
    pub active: bool,
}

impl LetterCell {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display == PLACEHOLDER
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    pos: CellPos,
    solution: char,
    entry: Option<char>,
}

/// Letter-by-letter answer grid with a single input cursor.
///
/// Cells are kept in reading order (word by word, letter by letter). A cell is
/// revealed either because its word received a whole-word hint (first letters
/// only) or because it was picked by an individual letter hint (never a first
/// letter). Revealed cells always display their solution and ignore input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterGrid {
    slots: Vec<Slot>,
    word_count: usize,
    words_hinted: usize,
    revealed_letters: BTreeSet<CellPos>,
    active: Option<usize>,
}

impl LetterGrid {
    #[must_use]
    pub fn new(answer: &Answer) -> Self {
        let slots = answer
            .words()
            .iter()
            .enumerate()
            .flat_map(|(word, letters)| {
                letters.iter().enumerate().map(move |(letter, solution)| Slot {
                    pos: CellPos::new(word, letter),
                    solution: *solution,
                    entry: None,
                })
            })
            .collect();
        Self {
            slots,
            word_count: answer.word_count(),
            words_hinted: 0,
            revealed_letters: BTreeSet::new(),
            active: None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    #[must_use]
    pub fn words_hinted(&self) -> usize {
        self.words_hinted
    }

    #[must_use]
    pub fn letters_revealed(&self) -> usize {
        self.revealed_letters.len()
    }

    /// Whole-word hints plus individual letter hints.
    #[must_use]
    pub fn hints_used(&self) -> usize {
        self.words_hinted + self.revealed_letters.len()
    }

    #[must_use]
    pub fn active(&self) -> Option<CellPos> {
        self.active.map(|idx| self.slots[idx].pos)
    }

    #[must_use]
    pub fn is_revealed(&self, pos: CellPos) -> bool {
        self.index_of(pos).is_some_and(|idx| self.revealed_at(idx))
    }

    /// Snapshot of every cell in reading order.
    #[must_use]
    pub fn cells(&self) -> Vec<LetterCell> {
        (0..self.slots.len())
            .map(|idx| {
                let slot = &self.slots[idx];
                LetterCell {
                    pos: slot.pos,
                    revealed: self.revealed_at(idx),
                    display: self.display_at(idx),
                    word_start: slot.pos.letter == 0,
                    active: self.active == Some(idx),
                }
            })
            .collect()
    }

    /// Displayed characters in reading order, placeholders included.
    #[must_use]
    pub fn guess(&self) -> String {
        (0..self.slots.len()).map(|idx| self.display_at(idx)).collect()
    }

    // ─── Input ────────────────────────────────────────────────────────────────

    /// Type `ch` into the grid.
    ///
    /// The letter lands in the active cell when that cell is open, otherwise in
    /// the first empty open cell. The cursor then moves to the next empty open
    /// cell after the written one, or is cleared. Returns `false` when `ch` is
    /// not alphabetic or there is nowhere to write.
    pub fn input_letter(&mut self, ch: char) -> bool {
        if !ch.is_alphabetic() {
            return false;
        }
        let Some(letter) = ch.to_uppercase().next() else {
            return false;
        };

        let target = match self.active {
            Some(idx) if !self.revealed_at(idx) => Some(idx),
            _ => (0..self.slots.len()).find(|idx| self.is_empty_open(*idx)),
        };
        let Some(target) = target else {
            return false;
        };

        self.slots[target].entry = Some(letter);
        self.active = (target + 1..self.slots.len()).find(|idx| self.is_empty_open(*idx));
        true
    }

    /// Delete towards the start of the grid.
    pub fn backspace(&mut self) {
        match self.active {
            None => {
                self.active = (0..self.slots.len())
                    .rev()
                    .find(|idx| self.is_filled_open(*idx));
            }
            Some(idx) if self.revealed_at(idx) => {
                if let Some(prev) = self.previous_filled_open(idx) {
                    self.active = Some(prev);
                }
            }
            Some(idx) => {
                self.slots[idx].entry = None;
                if let Some(prev) = self.previous_filled_open(idx) {
                    self.active = Some(prev);
                }
            }
        }
    }

    /// Jump to the start of the next word that has not been hinted.
    pub fn advance_word(&mut self) {
        let from = self.active.map_or(0, |idx| idx + 1);
        if let Some(next) = (from..self.slots.len())
            .find(|idx| self.slots[*idx].pos.letter == 0 && !self.revealed_at(*idx))
        {
            self.active = Some(next);
        }
    }

    /// Put the cursor on `pos`. Revealed or unknown cells are ignored.
    pub fn select(&mut self, pos: CellPos) -> bool {
        match self.index_of(pos) {
            Some(idx) if !self.revealed_at(idx) => {
                self.active = Some(idx);
                true
            }
            _ => false,
        }
    }

    /// Clear every open cell and put the cursor on the first one.
    pub fn clear_open(&mut self) {
        for idx in 0..self.slots.len() {
            if !self.revealed_at(idx) {
                self.slots[idx].entry = None;
            }
        }
        self.active = (0..self.slots.len()).find(|idx| !self.revealed_at(*idx));
    }

    /// Write the solution into every cell and drop the cursor.
    pub fn fill_solution(&mut self) {
        for slot in &mut self.slots {
            slot.entry = Some(slot.solution);
        }
        self.active = None;
    }

    // ─── Hints ────────────────────────────────────────────────────────────────

    /// Reveal the first letter of the next word in order.
    ///
    /// Returns the revealed cell, or `None` once every word has been hinted.
    pub fn reveal_next_word(&mut self) -> Option<CellPos> {
        if self.words_hinted >= self.word_count {
            return None;
        }
        let pos = CellPos::new(self.words_hinted, 0);
        self.words_hinted += 1;
        Some(pos)
    }

    /// Non-first letters that no letter hint has revealed yet.
    #[must_use]
    pub fn letter_hint_candidates(&self) -> Vec<CellPos> {
        self.slots
            .iter()
            .map(|slot| slot.pos)
            .filter(|pos| pos.letter > 0 && !self.revealed_letters.contains(pos))
            .collect()
    }

    /// Reveal a single non-first letter. Returns `false` if `pos` is not a candidate.
    pub fn reveal_letter(&mut self, pos: CellPos) -> bool {
        if pos.letter == 0 || self.index_of(pos).is_none() {
            return false;
        }
        self.revealed_letters.insert(pos)
    }

    // ─── Helpers ──────────────────────────────────────────────────────────────

    fn index_of(&self, pos: CellPos) -> Option<usize> {
        self.slots.binary_search_by(|slot| slot.pos.cmp(&pos)).ok()
    }

    fn revealed_at(&self, idx: usize) -> bool {
        let pos = self.slots[idx].pos;
        (pos.letter == 0 && pos.word < self.words_hinted) || self.revealed_letters.contains(&pos)
    }

    fn display_at(&self, idx: usize) -> char {
        let slot = &self.slots[idx];
        if self.revealed_at(idx) {
            slot.solution
        } else {
            slot.entry.unwrap_or(PLACEHOLDER)
        }
    }

    fn is_empty_open(&self, idx: usize) -> bool {
        !self.revealed_at(idx) && self.slots[idx].entry.is_none()
    }

    fn is_filled_open(&self, idx: usize) -> bool {
        !self.revealed_at(idx) && self.slots[idx].entry.is_some()
    }

    fn previous_filled_open(&self, idx: usize) -> Option<usize> {
        (0..idx).rev().find(|prev| self.is_filled_open(*prev))
    }
}
