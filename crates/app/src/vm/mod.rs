mod quiz_vm;
mod time_fmt;

pub use quiz_vm::{QuestionView, QuizIntent, QuizVm, StepOutcome};
pub use time_fmt::format_remaining;
