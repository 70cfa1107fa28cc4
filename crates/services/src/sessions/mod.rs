mod progress;
mod service;
mod ticker;
mod view;
mod workflow;

// Public API of the quiz session subsystem.
pub use progress::{QuizOutcome, QuizSummary};
pub use service::{
    Advance, AnswerFeedback, QuestionPhase, QuizSession, SessionStatus, TickOutcome,
};
pub use view::{ChoiceState, ChoiceView, QuestionView, SessionSnapshot};
pub use workflow::QuizController;
