use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::Question;

use crate::error::SessionError;

/// Builds the ordered question sequence for one quiz.
///
/// The bank is only borrowed; every build works on its own copy so the same
/// bank can be replayed in order after a shuffled attempt.
pub struct SequenceBuilder<'a> {
    bank: &'a [Question],
    randomize: bool,
}

impl<'a> SequenceBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a [Question]) -> Self {
        Self {
            bank,
            randomize: false,
        }
    }

    /// Enable or disable shuffling of the sequence.
    #[must_use]
    pub fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    /// Build the sequence using the thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if the bank has no questions.
    pub fn build(self) -> Result<Vec<Question>, SessionError> {
        self.build_with_rng(&mut rng())
    }

    /// Build the sequence, shuffling with `rng` when randomization is on.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if the bank has no questions.
    pub fn build_with_rng<R: Rng + ?Sized>(
        self,
        rng: &mut R,
    ) -> Result<Vec<Question>, SessionError> {
        if self.bank.is_empty() {
            return Err(SessionError::EmptyBank);
        }

        let mut sequence = self.bank.to_vec();
        if self.randomize {
            // Fisher-Yates.
            sequence.as_mut_slice().shuffle(rng);
        }
        tracing::debug!(
            questions = sequence.len(),
            randomize = self.randomize,
            "built question sequence"
        );
        Ok(sequence)
    }
}

/// Shorthand for `SequenceBuilder::new(bank).with_randomize(randomize).build()`.
///
/// # Errors
///
/// Returns `SessionError::EmptyBank` if the bank has no questions.
pub fn build_sequence(bank: &[Question], randomize: bool) -> Result<Vec<Question>, SessionError> {
    SequenceBuilder::new(bank).with_randomize(randomize).build()
}
