use puzzle_core::model::LetterCell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellVm {
    pub word: usize,
    pub letter: usize,
    pub display: char,
    pub revealed: bool,
    pub active: bool,
    pub empty: bool,
}

impl CellVm {
    #[must_use]
    pub fn class(&self) -> String {
        let mut class = String::from("letter-cell");
        if self.revealed {
            class.push_str(" letter-cell--revealed");
        }
        if self.active {
            class.push_str(" letter-cell--active");
        }
        if self.empty {
            class.push_str(" letter-cell--empty");
        }
        class
    }
}

impl From<&LetterCell> for CellVm {
    fn from(cell: &LetterCell) -> Self {
        Self {
            word: cell.pos.word,
            letter: cell.pos.letter,
            display: cell.display,
            revealed: cell.revealed,
            active: cell.active,
            empty: cell.is_empty(),
        }
    }
}

/// One word of the grid, rendered as a group of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordVm {
    pub cells: Vec<CellVm>,
}

/// Group cells into words; a new group starts at every word-start cell.
#[must_use]
pub fn map_grid(cells: &[LetterCell]) -> Vec<WordVm> {
    let mut words: Vec<WordVm> = Vec::new();
    for cell in cells {
        if cell.word_start || words.is_empty() {
            words.push(WordVm { cells: Vec::new() });
        }
        if let Some(word) = words.last_mut() {
            word.cells.push(CellVm::from(cell));
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::model::{Answer, LetterGrid};

    #[test]
    fn groups_cells_by_word() {
        let mut grid = LetterGrid::new(&Answer::parse("NEW YORK").unwrap());
        grid.input_letter('n');
        let words = map_grid(&grid.cells());

        assert_eq!(words.len(), 2);
        assert_eq!(words[0].cells.len(), 3);
        assert_eq!(words[1].cells.len(), 4);
        assert_eq!(words[0].cells[0].display, 'N');
        assert!(words[0].cells[1].active);
        assert_eq!(
            words[0].cells[1].class(),
            "letter-cell letter-cell--active letter-cell--empty"
        );
    }
}
