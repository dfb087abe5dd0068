/// Lifecycle state of a quiz session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    #[default]
    Configuring,
    Active,
    Finished,
}

impl QuizPhase {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, QuizPhase::Active)
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, QuizPhase::Finished)
    }
}

/// How an option should be presented once the user has answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OptionFeedback {
    #[default]
    Neutral,
    Correct,
    Incorrect,
}
