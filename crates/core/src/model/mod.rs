mod config;
mod feedback;
mod key;
mod question;

pub use config::{ConfigError, QuizConfiguration, TimeLimit};
pub use feedback::{OptionFeedback, QuizPhase};
pub use key::OptionKey;
pub use question::{Question, QuestionError, QuestionOption};
