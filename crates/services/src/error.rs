//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ConfigError, OptionKey};
use storage::repository::StorageError;

/// Errors emitted by quiz services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available")]
    EmptyBank,
    #[error("quiz already started")]
    AlreadyStarted,
    #[error("{key} is not an option of the current question")]
    InvalidOption { key: OptionKey },
    #[error("quiz session lock poisoned")]
    Lock,
    #[error("countdown task failed: {0}")]
    Countdown(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
