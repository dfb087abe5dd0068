use async_trait::async_trait;
use quiz_core::model::{Question, QuestionError};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by question bank sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("question #{index} is invalid: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Persisted shape for a question.
///
/// Mirrors the domain `Question` so sources can deserialize without leaking
/// wire concerns into the domain layer. `options` is a JSON object whose
/// entries keep the order they appear in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question_text: String,
    #[serde(with = "ordered_options")]
    pub options: Vec<(String, String)>,
    pub correct_answer: String,
}

impl QuestionRecord {
    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the record does not describe a valid question.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(self.question_text, self.options, self.correct_answer)
    }
}

/// Reads and writes an option object as key/text pairs in document order.
///
/// Repeated keys are kept so validation can report them.
mod ordered_options {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(options: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(options.len()))?;
        for (key, text) in options {
            map.serialize_entry(key, text)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(OptionsVisitor)
    }

    struct OptionsVisitor;

    impl<'de> Visitor<'de> for OptionsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object mapping option keys to option text")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut options = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry::<String, String>()? {
                options.push(entry);
            }
            Ok(options)
        }
    }
}

/// Converts records into questions, reporting the position of the first bad one.
///
/// # Errors
///
/// Returns `StorageError::InvalidRecord` for the first record that fails validation.
pub fn records_into_questions(
    records: impl IntoIterator<Item = QuestionRecord>,
) -> Result<Vec<Question>, StorageError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .into_question()
                .map_err(|source| StorageError::InvalidRecord { index, source })
        })
        .collect()
}

/// Read-only source of the questions offered to a quiz.
#[async_trait]
pub trait QuestionBankRepository: Send + Sync {
    /// Load every question in bank order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read or contains invalid records.
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError>;
}

/// Simple in-memory bank for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(Mutex::new(questions)),
        }
    }

    /// Append a question to the end of the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the bank lock is poisoned.
    pub fn push_question(&self, question: Question) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(question);
        Ok(())
    }
}

#[async_trait]
impl QuestionBankRepository for InMemoryRepository {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}
