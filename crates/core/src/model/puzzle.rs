use thiserror::Error;

use crate::model::PuzzleId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PuzzleError {
    #[error("puzzle {id} has an empty answer")]
    EmptyAnswer { id: PuzzleId },

    #[error("puzzle {id} has an empty image path")]
    EmptyImagePath { id: PuzzleId },

    #[error("puzzle {id} has a non-letter {ch:?} in its answer")]
    NonLetterAnswer { id: PuzzleId, ch: char },
}

/// Why an answer text cannot be played.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AnswerError {
    #[error("answer has no words")]
    Empty,

    #[error("answer contains the non-letter {0:?}")]
    NonLetter(char),
}

/// The solution of a puzzle, split into words of uppercase letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    text: String,
    words: Vec<Vec<char>>,
}

impl Answer {
    /// Split `text` on whitespace into words of letters.
    ///
    /// Every cell must be typeable, so anything but letters and whitespace is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::Empty` when no word remains and
    /// `AnswerError::NonLetter` for the first character that is not a letter.
    pub fn parse(text: &str) -> Result<Self, AnswerError> {
        if let Some(ch) = text
            .chars()
            .find(|ch| !ch.is_whitespace() && !ch.is_alphabetic())
        {
            return Err(AnswerError::NonLetter(ch));
        }
        let words: Vec<Vec<char>> = text
            .split_whitespace()
            .map(|word| word.chars().flat_map(char::to_uppercase).collect())
            .collect();
        if words.is_empty() {
            return Err(AnswerError::Empty);
        }
        Ok(Self {
            text: text.trim().to_string(),
            words,
        })
    }

    /// The answer as written in the catalog.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn words(&self) -> &[Vec<char>] {
        &self.words
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// All letters with word boundaries removed.
    #[must_use]
    pub fn compact(&self) -> String {
        self.words.iter().flatten().collect()
    }

    /// Case-insensitive comparison that ignores whitespace in `guess`.
    #[must_use]
    pub fn matches(&self, guess: &str) -> bool {
        let guess: String = guess
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect();
        guess == self.compact()
    }
}

/// One catalog entry: an image and the words it depicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    id: PuzzleId,
    image_path: String,
    answer: Answer,
}

impl Puzzle {
    /// # Errors
    ///
    /// Returns `PuzzleError` if the image path is blank or the answer is empty or
    /// holds anything other than letters.
    pub fn new(
        id: PuzzleId,
        image_path: impl Into<String>,
        answer: &str,
    ) -> Result<Self, PuzzleError> {
        let image_path = image_path.into();
        if image_path.trim().is_empty() {
            return Err(PuzzleError::EmptyImagePath { id });
        }
        let answer = match Answer::parse(answer) {
            Ok(answer) => answer,
            Err(AnswerError::Empty) => return Err(PuzzleError::EmptyAnswer { id }),
            Err(AnswerError::NonLetter(ch)) => {
                return Err(PuzzleError::NonLetterAnswer { id, ch });
            }
        };
        Ok(Self {
            id,
            image_path,
            answer,
        })
    }

    #[must_use]
    pub fn id(&self) -> &PuzzleId {
        &self.id
    }

    #[must_use]
    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    #[must_use]
    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    /// Title shown above the image.
    #[must_use]
    pub fn title(&self) -> String {
        format!("Puzzle #{}", self.id)
    }
}
