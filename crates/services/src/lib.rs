#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod provider;
pub mod question_source;
pub mod sessions;

pub use config::{ProviderConfig, QuizSettings, TriviaConfig};
pub use error::{FailureKind, ProviderError, SourceError};
pub use provider::{BatchRequest, OpenTdbClient, ScriptedProvider, ScriptedResponse, TriviaProvider};
pub use question_source::{Batch, QuestionSource};

pub use sessions::{
    Advance, AnswerFeedback, ChoiceState, ChoiceView, QuestionPhase, QuestionView, QuizController,
    QuizOutcome, QuizSession, QuizSummary, SessionSnapshot, SessionStatus, TickOutcome,
};
