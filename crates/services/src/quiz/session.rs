use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::Clock;
use quiz_core::model::{OptionFeedback, OptionKey, Question, QuizConfiguration, QuizPhase};

use super::progress::QuizProgress;
use crate::error::SessionError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of offering an answer to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The key is now the locked answer for the current question.
    Locked,
    /// The session is not active or an answer is already locked.
    Ignored,
}

/// Result of asking the session to move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextQuestion { index: usize },
    Finished,
    /// The session is not active or no answer is locked yet.
    Ignored,
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining_seconds: u32 },
    Expired,
    /// The session is not active.
    Ignored,
}

/// Answer locked for one question of the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub index: usize,
    pub key: OptionKey,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single-user quiz session.
///
/// Moves `Configuring -> Active -> Finished`. Operations that do not apply to
/// the current phase are no-ops rather than errors, so late or duplicated
/// events (a tick racing the last answer, a double click) are harmless.
/// `Finished` is terminal; play again by constructing a new session.
pub struct QuizSession {
    clock: Clock,
    phase: QuizPhase,
    config: Option<QuizConfiguration>,
    questions: Vec<Question>,
    current: usize,
    selected: Option<OptionKey>,
    remaining_seconds: u32,
    answers: Vec<AnswerRecord>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// Create a session in the `Configuring` phase.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Clock::default())
    }

    /// Create a session that stamps start/finish times from `clock`.
    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            phase: QuizPhase::Configuring,
            config: None,
            questions: Vec::new(),
            current: 0,
            selected: None,
            remaining_seconds: 0,
            answers: Vec::new(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Start the quiz with an already built question sequence.
    ///
    /// The countdown begins now; the host is expected to start delivering
    /// [`QuizSession::tick`] once per second.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if `questions` is empty and
    /// `SessionError::AlreadyStarted` if the session left `Configuring`.
    /// The session stays in `Configuring` on error.
    pub fn start(
        &mut self,
        config: QuizConfiguration,
        questions: Vec<Question>,
    ) -> Result<(), SessionError> {
        if self.phase != QuizPhase::Configuring {
            return Err(SessionError::AlreadyStarted);
        }
        if questions.is_empty() {
            return Err(SessionError::EmptyBank);
        }

        self.config = Some(config);
        self.questions = questions;
        self.current = 0;
        self.selected = None;
        self.remaining_seconds = config.time_limit().seconds();
        self.phase = QuizPhase::Active;
        self.started_at = Some(self.clock.now());

        tracing::info!(
            questions = self.questions.len(),
            time_limit_minutes = config.time_limit_minutes(),
            randomize = config.randomize(),
            "quiz started"
        );
        Ok(())
    }

    /// Lock `key` as the answer to the current question.
    ///
    /// Ignored unless the session is active and nothing is locked yet; the
    /// first choice wins. The key is not checked against the options.
    pub fn select_answer(&mut self, key: impl Into<OptionKey>) -> SelectOutcome {
        if !self.accepts_answer() {
            return SelectOutcome::Ignored;
        }
        self.lock_answer(key.into());
        SelectOutcome::Locked
    }

    /// Like [`QuizSession::select_answer`], but rejects keys that are not
    /// options of the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` if the session would accept an
    /// answer and `key` names no option of the current question.
    pub fn try_select_answer(
        &mut self,
        key: impl Into<OptionKey>,
    ) -> Result<SelectOutcome, SessionError> {
        if !self.accepts_answer() {
            return Ok(SelectOutcome::Ignored);
        }
        let key = key.into();
        let known = self
            .current_question()
            .is_some_and(|question| question.has_option(&key));
        if !known {
            return Err(SessionError::InvalidOption { key });
        }
        self.lock_answer(key);
        Ok(SelectOutcome::Locked)
    }

    /// Move past the current question once an answer is locked.
    ///
    /// On the last question the session finishes and the index stays put.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if !self.phase.is_active() || self.selected.is_none() {
            return AdvanceOutcome::Ignored;
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.selected = None;
            tracing::debug!(index = self.current, "advanced to next question");
            AdvanceOutcome::NextQuestion {
                index: self.current,
            }
        } else {
            self.finish();
            AdvanceOutcome::Finished
        }
    }

    /// Count down one second.
    ///
    /// Reaching zero finishes the session wherever it is in the sequence.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.phase.is_active() {
            return TickOutcome::Ignored;
        }

        if self.remaining_seconds > 1 {
            self.remaining_seconds -= 1;
            tracing::trace!(remaining_seconds = self.remaining_seconds, "tick");
            TickOutcome::Running {
                remaining_seconds: self.remaining_seconds,
            }
        } else {
            self.remaining_seconds = 0;
            self.finish();
            TickOutcome::Expired
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// How `key` should be shown for the current question.
    ///
    /// Everything is neutral until an answer is locked; afterwards the correct
    /// option is marked correct and a wrong locked answer incorrect.
    #[must_use]
    pub fn option_feedback(&self, key: &OptionKey) -> OptionFeedback {
        let (Some(selected), Some(question)) = (&self.selected, self.current_question()) else {
            return OptionFeedback::Neutral;
        };

        if question.is_correct(key) {
            OptionFeedback::Correct
        } else if key == selected {
            OptionFeedback::Incorrect
        } else {
            OptionFeedback::Neutral
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn ordered_questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<&OptionKey> {
        self.selected.as_ref()
    }

    /// Configuration the session was started with.
    #[must_use]
    pub fn configuration(&self) -> Option<QuizConfiguration> {
        self.config
    }

    /// Answers locked so far, one per visited question.
    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.questions.len();
        let answered = self.answers.len();
        QuizProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            remaining_seconds: self.remaining_seconds,
            is_finished: self.is_finished(),
        }
    }

    fn accepts_answer(&self) -> bool {
        self.phase.is_active() && self.selected.is_none()
    }

    fn lock_answer(&mut self, key: OptionKey) {
        tracing::debug!(index = self.current, key = %key, "answer locked");
        self.answers.push(AnswerRecord {
            index: self.current,
            key: key.clone(),
        });
        self.selected = Some(key);
    }

    fn finish(&mut self) {
        self.phase = QuizPhase::Finished;
        self.finished_at = Some(self.clock.now());
        tracing::info!(
            index = self.current,
            answered = self.answers.len(),
            remaining_seconds = self.remaining_seconds,
            "quiz finished"
        );
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("selected", &self.selected)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("started_at", &self.started_at)
            .field("finished_at", &self.finished_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
