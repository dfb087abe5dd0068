use async_trait::async_trait;
use quiz_core::model::Question;

use crate::json::parse_bank;
use crate::repository::{QuestionBankRepository, StorageError};

const BUILTIN_BANK: &str = include_str!("../data/builtin_questions.json");

/// General-knowledge bank compiled into the binary.
///
/// Used when the host is not pointed at a bank file.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinQuestionBank;

impl BuiltinQuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QuestionBankRepository for BuiltinQuestionBank {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        parse_bank(BUILTIN_BANK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtin_bank_is_valid_and_non_empty() {
        let questions = BuiltinQuestionBank::new().load_questions().await.unwrap();
        assert!(questions.len() >= 5);
    }
}
