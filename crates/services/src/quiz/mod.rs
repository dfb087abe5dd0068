mod countdown;
mod progress;
mod sequence;
mod session;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::SessionError;
pub use countdown::{Countdown, CountdownEnd, CountdownHandle, SharedSession};
pub use progress::QuizProgress;
pub use sequence::{SequenceBuilder, build_sequence};
pub use session::{AdvanceOutcome, AnswerRecord, QuizSession, SelectOutcome, TickOutcome};
pub use workflow::QuizLoopService;
