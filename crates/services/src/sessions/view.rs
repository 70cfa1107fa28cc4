use trivia_core::model::Difficulty;

use super::progress::QuizOutcome;
use super::service::{QuestionPhase, QuizSession, SessionStatus};
use crate::error::FailureKind;

/// Highlight state of a choice button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceState {
    Neutral,
    /// Shown on the correct choice once the question is in feedback.
    Correct,
    /// Shown on the selected choice when it was wrong.
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub text: String,
    pub state: ChoiceState,
}

/// Display-ready view of the active question. Text is entity-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub category: String,
    pub difficulty: Difficulty,
    pub prompt: String,
    pub choices: Vec<ChoiceView>,
    pub phase: QuestionPhase,
    pub remaining_secs: u32,
    pub selected: Option<usize>,
    /// Only revealed in feedback.
    pub correct_position: Option<usize>,
}

impl QuestionView {
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }

    /// True when feedback was reached by the clock rather than a selection.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.phase == QuestionPhase::Feedback && self.selected.is_none()
    }
}

/// Read-only snapshot of a session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub category: String,
    pub difficulty: Difficulty,
    pub score: usize,
    pub total: usize,
    pub question: Option<QuestionView>,
    pub failure: Option<(String, FailureKind)>,
    pub outcome: Option<QuizOutcome>,
}

impl From<&QuizSession> for SessionSnapshot {
    fn from(session: &QuizSession) -> Self {
        Self {
            status: session.status(),
            category: session.category().name().to_owned(),
            difficulty: session.difficulty(),
            score: session.score(),
            total: session.total(),
            question: question_view(session),
            failure: session
                .load_failure()
                .map(|(message, kind)| (message.to_owned(), kind)),
            outcome: session.outcome(),
        }
    }
}

impl QuizSession {
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(self)
    }
}

fn question_view(session: &QuizSession) -> Option<QuestionView> {
    let question = session.current_question()?;
    let choices = session.choices()?;
    let phase = session.phase()?;
    let selected = session.selected();
    let in_feedback = phase == QuestionPhase::Feedback;

    let views = choices
        .iter()
        .enumerate()
        .map(|(position, choice)| {
            let state = if in_feedback && choice.is_correct() {
                ChoiceState::Correct
            } else if in_feedback && selected == Some(position) {
                ChoiceState::Incorrect
            } else {
                ChoiceState::Neutral
            };
            ChoiceView {
                text: choice.display_text(),
                state,
            }
        })
        .collect();

    Some(QuestionView {
        index: session.current_index()?,
        total: session.total(),
        category: question.display_category(),
        difficulty: question.difficulty(),
        prompt: question.display_prompt(),
        choices: views,
        phase,
        remaining_secs: session.remaining_secs()?,
        selected,
        correct_position: if in_feedback {
            choices.correct_position()
        } else {
            None
        },
    })
}
