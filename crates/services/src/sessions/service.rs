use std::fmt;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use trivia_core::model::{AnswerChoices, Category, Difficulty, Question};

use super::progress::{QuizOutcome, QuizSummary};
use crate::config::QuizSettings;
use crate::error::{FailureKind, SourceError};
use crate::question_source::Batch;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Coarse lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Ready,
    LoadFailed,
    Finished,
    Abandoned,
}

/// Per-question phase while the session is `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionPhase {
    /// Input accepted, countdown running.
    Answering,
    /// Result shown, input locked, no countdown.
    Feedback,
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is not answering; nothing changed.
    Ignored,
    Running { remaining_secs: u32 },
    /// Time ran out; the question moved to feedback unanswered.
    TimedOut,
}

/// Result of a successful answer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub position: usize,
    pub is_correct: bool,
    pub correct_position: Option<usize>,
    pub score: usize,
}

/// Result of `QuizSession::next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Not in feedback; nothing changed.
    Ignored,
    Question { index: usize },
    Finished(QuizSummary),
}

struct Round {
    questions: Batch,
    index: usize,
    score: usize,
    phase: QuestionPhase,
    remaining_secs: u32,
    selected: Option<usize>,
    choices: AnswerChoices,
}

impl Round {
    fn question(&self) -> &Question {
        &self.questions[self.index]
    }
}

enum State {
    Loading,
    Ready(Round),
    LoadFailed { message: String, kind: FailureKind },
    Finished(QuizSummary),
    Abandoned,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single-player quiz over one fetched batch.
///
/// Pure state machine: it performs no I/O and keeps no clock. The caller feeds
/// it the fetch result and one `tick` per elapsed second.
pub struct QuizSession {
    category: Category,
    difficulty: Difficulty,
    settings: QuizSettings,
    rng: Box<dyn RngCore + Send>,
    state: State,
    entries: u64,
}

impl QuizSession {
    #[must_use]
    pub fn new(category: Category, difficulty: Difficulty, settings: QuizSettings) -> Self {
        Self {
            category,
            difficulty,
            settings,
            rng: Box::new(StdRng::from_os_rng()),
            state: State::Loading,
            entries: 0,
        }
    }

    /// Replace the randomness used to permute answer choices.
    #[must_use]
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match self.state {
            State::Loading => SessionStatus::Loading,
            State::Ready(_) => SessionStatus::Ready,
            State::LoadFailed { .. } => SessionStatus::LoadFailed,
            State::Finished(_) => SessionStatus::Finished,
            State::Abandoned => SessionStatus::Abandoned,
        }
    }

    /// Number of per-question entries so far. Changes exactly when the active
    /// question changes, so it also identifies the current countdown.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.entries
    }

    #[must_use]
    pub fn total(&self) -> usize {
        match &self.state {
            State::Ready(round) => round.questions.len(),
            State::Finished(summary) => summary.total,
            _ => 0,
        }
    }

    #[must_use]
    pub fn score(&self) -> usize {
        match &self.state {
            State::Ready(round) => round.score,
            State::Finished(summary) => summary.score,
            _ => 0,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.round().map(|round| round.index)
    }

    /// Questions not yet finished, counting the active one.
    #[must_use]
    pub fn remaining_questions(&self) -> usize {
        self.round()
            .map_or(0, |round| round.questions.len() - round.index)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.round().map(Round::question)
    }

    #[must_use]
    pub fn choices(&self) -> Option<&AnswerChoices> {
        self.round().map(|round| &round.choices)
    }

    #[must_use]
    pub fn phase(&self) -> Option<QuestionPhase> {
        self.round().map(|round| round.phase)
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.round().map(|round| round.remaining_secs)
    }

    /// Position of the selected choice; `None` before input or after a timeout.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.round().and_then(|round| round.selected)
    }

    #[must_use]
    pub fn load_failure(&self) -> Option<(&str, FailureKind)> {
        match &self.state {
            State::LoadFailed { message, kind } => Some((message.as_str(), *kind)),
            _ => None,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Option<QuizOutcome> {
        match &self.state {
            State::Finished(summary) => Some(QuizOutcome::Completed(*summary)),
            State::Abandoned => Some(QuizOutcome::Abandoned),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, State::Finished(_) | State::Abandoned)
    }

    /// Feed the result of the batch fetch.
    ///
    /// Only accepted while `Loading`; returns `false` when the result was
    /// discarded (e.g. it arrived after the session was abandoned).
    pub fn apply_batch(&mut self, result: Result<Batch, SourceError>) -> bool {
        if !matches!(self.state, State::Loading) {
            return false;
        }

        self.state = match result {
            Ok(questions) if questions.is_empty() => {
                State::Finished(QuizSummary { score: 0, total: 0 })
            }
            Ok(questions) => {
                let choices = AnswerChoices::shuffled(&questions[0], &mut *self.rng);
                self.entries += 1;
                State::Ready(Round {
                    questions,
                    index: 0,
                    score: 0,
                    phase: QuestionPhase::Answering,
                    remaining_secs: self.settings.time_limit_secs,
                    selected: None,
                    choices,
                })
            }
            Err(err) => State::LoadFailed {
                message: format!("Failed to load questions: {err}"),
                kind: err.kind(),
            },
        };
        true
    }

    /// Count down one second of the active question.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(round) = self.answering_round() else {
            return TickOutcome::Ignored;
        };

        round.remaining_secs = round.remaining_secs.saturating_sub(1);
        if round.remaining_secs > 0 {
            return TickOutcome::Running {
                remaining_secs: round.remaining_secs,
            };
        }

        round.selected = None;
        round.phase = QuestionPhase::Feedback;
        TickOutcome::TimedOut
    }

    /// Submit the choice at `position`.
    ///
    /// Returns `None` without changing anything unless the session is answering
    /// and `position` addresses a choice.
    pub fn select_answer(&mut self, position: usize) -> Option<AnswerFeedback> {
        let round = self.answering_round()?;
        let is_correct = round.choices.get(position)?.is_correct();

        round.selected = Some(position);
        round.phase = QuestionPhase::Feedback;
        if is_correct {
            round.score += 1;
        }

        Some(AnswerFeedback {
            position,
            is_correct,
            correct_position: round.choices.correct_position(),
            score: round.score,
        })
    }

    /// Leave feedback for the next question, or finish after the last one.
    pub fn next(&mut self) -> Advance {
        let State::Ready(round) = &mut self.state else {
            return Advance::Ignored;
        };
        if round.phase != QuestionPhase::Feedback {
            return Advance::Ignored;
        }

        if round.index + 1 < round.questions.len() {
            round.index += 1;
            round.choices = AnswerChoices::shuffled(round.question(), &mut *self.rng);
            round.remaining_secs = self.settings.time_limit_secs;
            round.selected = None;
            round.phase = QuestionPhase::Answering;
            self.entries += 1;
            return Advance::Question { index: round.index };
        }

        let summary = QuizSummary {
            score: round.score,
            total: round.questions.len(),
        };
        self.state = State::Finished(summary);
        Advance::Finished(summary)
    }

    /// Leave the session. Terminal sessions keep their existing outcome.
    pub fn abandon(&mut self) -> QuizOutcome {
        if let Some(outcome) = self.outcome() {
            return outcome;
        }
        self.state = State::Abandoned;
        QuizOutcome::Abandoned
    }

    fn round(&self) -> Option<&Round> {
        match &self.state {
            State::Ready(round) => Some(round),
            _ => None,
        }
    }

    fn answering_round(&mut self) -> Option<&mut Round> {
        match &mut self.state {
            State::Ready(round) if round.phase == QuestionPhase::Answering => Some(round),
            _ => None,
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("category", &self.category.name())
            .field("difficulty", &self.difficulty)
            .field("status", &self.status())
            .field("index", &self.current_index())
            .field("score", &self.score())
            .field("phase", &self.phase())
            .field("remaining_secs", &self.remaining_secs())
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
