#![forbid(unsafe_code)]

pub mod builtin;
pub mod json;
pub mod repository;

pub use builtin::BuiltinQuestionBank;
pub use json::JsonQuestionBank;
pub use repository::{InMemoryRepository, QuestionBankRepository, QuestionRecord, StorageError};
