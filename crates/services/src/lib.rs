#![forbid(unsafe_code)]

pub mod error;
pub mod quiz;

pub use quiz_core::Clock;

pub use error::SessionError;
pub use quiz::{
    AdvanceOutcome, AnswerRecord, Countdown, CountdownEnd, CountdownHandle, QuizLoopService,
    QuizProgress, QuizSession, SelectOutcome, SequenceBuilder, SharedSession, TickOutcome,
    build_sequence,
};
