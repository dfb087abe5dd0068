use std::sync::Arc;

use quiz_core::model::{Question, QuizConfiguration};
use storage::repository::QuestionBankRepository;

use super::sequence::SequenceBuilder;
use super::session::QuizSession;
use crate::Clock;
use crate::error::SessionError;

/// Orchestrates loading the bank, building the sequence and starting a quiz.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<dyn QuestionBankRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<dyn QuestionBankRepository>) -> Self {
        Self { clock, bank }
    }

    /// Load the question bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if the bank has no questions and
    /// `SessionError::Storage` if it cannot be read.
    pub async fn load_bank(&self) -> Result<Vec<Question>, SessionError> {
        let questions = self.bank.load_questions().await?;
        if questions.is_empty() {
            return Err(SessionError::EmptyBank);
        }
        tracing::debug!(questions = questions.len(), "question bank loaded");
        Ok(questions)
    }

    /// Load the bank and start a quiz with `config`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for storage failures or an empty bank.
    pub async fn start_quiz(&self, config: QuizConfiguration) -> Result<QuizSession, SessionError> {
        let bank = self.load_bank().await?;
        self.start_from_bank(&bank, config)
    }

    /// Start a quiz from a bank that was already loaded.
    ///
    /// Lets the host replay the same bank without reloading it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if `bank` is empty.
    pub fn start_from_bank(
        &self,
        bank: &[Question],
        config: QuizConfiguration,
    ) -> Result<QuizSession, SessionError> {
        let sequence = SequenceBuilder::new(bank)
            .with_randomize(config.randomize())
            .build()?;
        let mut session = QuizSession::with_clock(self.clock);
        session.start(config, sequence)?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuizPhase, TimeLimit};
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn repo_with(n: usize) -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        for i in 0..n {
            repo.push_question(
                Question::new(format!("Q{i}"), [("A", "x"), ("B", "y")], "B").unwrap(),
            )
            .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn start_quiz_uses_bank_order_when_not_randomized() {
        let service = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(repo_with(3)));
        let config = QuizConfiguration::new(TimeLimit::TenMinutes, false);

        let session = service.start_quiz(config).await.unwrap();

        assert_eq!(session.phase(), QuizPhase::Active);
        assert_eq!(session.remaining_seconds(), 600);
        let texts: Vec<_> = session
            .ordered_questions()
            .iter()
            .map(Question::text)
            .collect();
        assert_eq!(texts, ["Q0", "Q1", "Q2"]);
        assert_eq!(session.started_at(), Some(fixed_now()));
    }

    #[tokio::test]
    async fn empty_bank_cannot_start() {
        let service = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(repo_with(0)));
        let err = service
            .start_quiz(QuizConfiguration::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::EmptyBank));
    }

    #[tokio::test]
    async fn replay_from_loaded_bank_keeps_order() {
        let service = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(repo_with(4)));
        let bank = service.load_bank().await.unwrap();

        let shuffled = service
            .start_from_bank(&bank, QuizConfiguration::new(TimeLimit::FiveMinutes, true))
            .unwrap();
        assert_eq!(shuffled.total_questions(), 4);

        let ordered = service
            .start_from_bank(&bank, QuizConfiguration::new(TimeLimit::FiveMinutes, false))
            .unwrap();
        assert_eq!(ordered.ordered_questions(), bank.as_slice());
    }
}
