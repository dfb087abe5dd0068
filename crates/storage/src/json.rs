use async_trait::async_trait;
use quiz_core::model::Question;
use serde::Deserialize;
use std::path::PathBuf;

use crate::repository::{
    QuestionBankRepository, QuestionRecord, StorageError, records_into_questions,
};

/// Accepted top-level layouts of a bank file.
#[derive(Deserialize)]
#[serde(untagged)]
enum BankDocument {
    Bare(Vec<QuestionRecord>),
    Wrapped { questions: Vec<QuestionRecord> },
}

/// Parse a JSON question bank.
///
/// The document is either an array of question records or an object with a
/// `questions` array.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::InvalidRecord` for records that fail validation.
pub fn parse_bank(raw: &str) -> Result<Vec<Question>, StorageError> {
    let records = match serde_json::from_str::<BankDocument>(raw)? {
        BankDocument::Bare(records) | BankDocument::Wrapped { questions: records } => records,
    };
    records_into_questions(records)
}

/// Question bank stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonQuestionBank {
    path: PathBuf,
}

impl JsonQuestionBank {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionBankRepository for JsonQuestionBank {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => {
                    StorageError::NotFound(self.path.display().to_string())
                }
                _ => StorageError::Io(err),
            })?;
        parse_bank(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionError;

    #[test]
    fn parses_bare_array() {
        let raw = r#"[
            {"question_text": "2+2?", "options": {"A": "3", "B": "4"}, "correct_answer": "B"}
        ]"#;
        let questions = parse_bank(raw).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer().as_str(), "B");
    }

    #[test]
    fn parses_wrapped_document() {
        let raw = r#"{"questions": [
            {"question_text": "Q1", "options": {"A": "x", "B": "y"}, "correct_answer": "A"},
            {"question_text": "Q2", "options": {"A": "x", "B": "y"}, "correct_answer": "B"}
        ]}"#;
        let questions = parse_bank(raw).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].text(), "Q2");
    }

    #[test]
    fn options_keep_file_order() {
        let raw = r#"[
            {"question_text": "Q", "options": {"C": "c", "A": "a", "B": "b"}, "correct_answer": "A"}
        ]"#;
        let questions = parse_bank(raw).unwrap();
        let keys: Vec<_> = questions[0].options().iter().map(|o| o.key().as_str()).collect();
        assert_eq!(keys, ["C", "A", "B"]);
        assert_eq!(questions[0].options()[1].text(), "a");
    }

    #[test]
    fn repeated_option_key_is_rejected() {
        let raw = r#"[
            {"question_text": "Q", "options": {"A": "x", "B": "y", "A": "z"}, "correct_answer": "A"}
        ]"#;
        let err = parse_bank(raw).unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidRecord {
                index: 0,
                source: QuestionError::DuplicateKey { .. }
            }
        ));
    }

    #[test]
    fn empty_array_is_an_empty_bank() {
        assert!(parse_bank("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = parse_bank("{not json").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
