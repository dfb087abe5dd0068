use std::collections::HashSet;

use thiserror::Error;

use crate::model::key::OptionKey;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question needs at least two options, got {count}")]
    TooFewOptions { count: usize },

    #[error("option key cannot be blank")]
    BlankKey,

    #[error("duplicate option key: {key}")]
    DuplicateKey { key: OptionKey },

    #[error("option {key} has no text")]
    EmptyOptionText { key: OptionKey },

    #[error("correct answer {key} is not one of the options")]
    UnknownCorrectAnswer { key: OptionKey },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One selectable option of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOption {
    key: OptionKey,
    text: String,
}

impl QuestionOption {
    #[must_use]
    pub fn key(&self) -> &OptionKey {
        &self.key
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A multiple-choice question.
///
/// Options keep the order they were supplied in. A question is immutable once
/// built; sessions only ever read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<QuestionOption>,
    correct_answer: OptionKey,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, fewer than two options are
    /// given, an option key is blank or repeated, an option has no text, or
    /// `correct_answer` does not name one of the options.
    pub fn new<K, T>(
        text: impl Into<String>,
        options: impl IntoIterator<Item = (K, T)>,
        correct_answer: impl Into<OptionKey>,
    ) -> Result<Self, QuestionError>
    where
        K: Into<OptionKey>,
        T: Into<String>,
    {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let mut seen = HashSet::new();
        let mut built = Vec::new();
        for (key, option_text) in options {
            let key = key.into();
            if key.is_blank() {
                return Err(QuestionError::BlankKey);
            }
            if !seen.insert(key.clone()) {
                return Err(QuestionError::DuplicateKey { key });
            }
            let option_text = option_text.into();
            if option_text.trim().is_empty() {
                return Err(QuestionError::EmptyOptionText { key });
            }
            built.push(QuestionOption {
                key,
                text: option_text,
            });
        }

        if built.len() < 2 {
            return Err(QuestionError::TooFewOptions { count: built.len() });
        }

        let correct_answer = correct_answer.into();
        if !seen.contains(&correct_answer) {
            return Err(QuestionError::UnknownCorrectAnswer {
                key: correct_answer,
            });
        }

        Ok(Self {
            text,
            options: built,
            correct_answer,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, key: &OptionKey) -> Option<&QuestionOption> {
        self.options.iter().find(|o| &o.key == key)
    }

    #[must_use]
    pub fn has_option(&self, key: &OptionKey) -> bool {
        self.option(key).is_some()
    }

    #[must_use]
    pub fn correct_answer(&self) -> &OptionKey {
        &self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self, key: &OptionKey) -> bool {
        &self.correct_answer == key
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
