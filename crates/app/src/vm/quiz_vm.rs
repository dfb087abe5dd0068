use std::fmt::Write as _;

use quiz_core::model::{OptionFeedback, OptionKey, Question};
use services::{AdvanceOutcome, QuizSession, SelectOutcome, SessionError};

use super::time_fmt::format_remaining;

/// What the user asked for on one input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(OptionKey),
    Advance,
    Help,
    Quit,
}

impl QuizIntent {
    /// Reads one input line. A blank line means "next".
    ///
    /// Input naming an option of `question` selects it, even when it also
    /// spells a command shortcut such as `n` or `q`.
    #[must_use]
    pub fn parse(line: &str, question: Option<&Question>) -> Self {
        let Some(key) = OptionKey::normalized(line) else {
            return Self::Advance;
        };
        if question.is_some_and(|q| q.has_option(&key)) {
            return Self::Select(key);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "n" | "next" => Self::Advance,
            "q" | "quit" | "exit" => Self::Quit,
            "?" | "h" | "help" => Self::Help,
            _ => Self::Select(key),
        }
    }
}

/// Result of applying an intent, for the host to print.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Answered,
    NextQuestion,
    Finished,
    AlreadyAnswered,
    NotAnswered,
    InvalidOption(OptionKey),
    Help,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionView {
    pub key: String,
    pub text: String,
    pub feedback: OptionFeedback,
}

/// Snapshot of the current question, ready to print.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionView {
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<OptionView>,
    pub remaining: String,
    pub answered: bool,
}

impl QuestionView {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        let question = session.current_question()?;
        let options = question
            .options()
            .iter()
            .map(|option| OptionView {
                key: option.key().to_string(),
                text: option.text().to_owned(),
                feedback: session.option_feedback(option.key()),
            })
            .collect();

        Some(Self {
            number: session.current_index() + 1,
            total: session.total_questions(),
            text: question.text().to_owned(),
            options,
            remaining: format_remaining(session.remaining_seconds()),
            answered: session.selected_answer().is_some(),
        })
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Question {}/{}  [{} left]",
            self.number, self.total, self.remaining
        );
        let _ = writeln!(out, "{}", self.text);
        for option in &self.options {
            let marker = match option.feedback {
                OptionFeedback::Neutral => "",
                OptionFeedback::Correct => "  <- correct",
                OptionFeedback::Incorrect => "  <- your answer",
            };
            let _ = writeln!(out, "  {}) {}{}", option.key, option.text, marker);
        }
        if self.answered {
            out.push_str("Press Enter for the next question.");
        } else {
            out.push_str("Your answer:");
        }
        out
    }
}

/// Maps user intents onto session operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizVm {
    strict: bool,
}

impl QuizVm {
    /// With `strict`, keys that are not options of the question are refused.
    #[must_use]
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn apply(&self, session: &mut QuizSession, intent: QuizIntent) -> StepOutcome {
        match intent {
            QuizIntent::Select(key) => self.select(session, key),
            QuizIntent::Advance => match session.advance() {
                AdvanceOutcome::NextQuestion { .. } => StepOutcome::NextQuestion,
                AdvanceOutcome::Finished => StepOutcome::Finished,
                AdvanceOutcome::Ignored if session.is_finished() => StepOutcome::Finished,
                AdvanceOutcome::Ignored => StepOutcome::NotAnswered,
            },
            QuizIntent::Help => StepOutcome::Help,
            QuizIntent::Quit => StepOutcome::Quit,
        }
    }

    fn select(&self, session: &mut QuizSession, key: OptionKey) -> StepOutcome {
        let outcome = if self.strict {
            match session.try_select_answer(key) {
                Ok(outcome) => outcome,
                Err(SessionError::InvalidOption { key }) => return StepOutcome::InvalidOption(key),
                Err(err) => {
                    tracing::warn!(error = %err, "unexpected selection error");
                    SelectOutcome::Ignored
                }
            }
        } else {
            session.select_answer(key)
        };

        match outcome {
            SelectOutcome::Locked => StepOutcome::Answered,
            SelectOutcome::Ignored if session.is_finished() => StepOutcome::Finished,
            SelectOutcome::Ignored => StepOutcome::AlreadyAnswered,
        }
    }
}
