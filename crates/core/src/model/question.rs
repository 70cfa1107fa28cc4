use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Difficulty;
use crate::text::decode_entities;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt must not be empty")]
    EmptyPrompt,
    #[error("correct answer must not be empty")]
    EmptyCorrectAnswer,
    #[error("question needs at least one incorrect answer")]
    NoIncorrectAnswers,
    #[error("correct answer {0:?} also appears among the incorrect answers")]
    CorrectAmongIncorrect(String),
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// One multiple-choice question as delivered by the provider.
///
/// Text is stored raw (possibly HTML-encoded). The `display_*` accessors
/// decode entities for rendering; correctness checks always use the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    category: String,
    difficulty: Difficulty,
    prompt: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or correct answer is blank, there
    /// are no incorrect answers, or the correct answer is also listed as incorrect.
    pub fn new(
        category: impl Into<String>,
        difficulty: Difficulty,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        incorrect_answers: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let correct_answer = correct_answer.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyCorrectAnswer);
        }
        if incorrect_answers.is_empty() {
            return Err(QuestionError::NoIncorrectAnswers);
        }
        if incorrect_answers.iter().any(|a| *a == correct_answer) {
            return Err(QuestionError::CorrectAmongIncorrect(correct_answer));
        }

        Ok(Self {
            category: category.into(),
            difficulty,
            prompt,
            correct_answer,
            incorrect_answers,
        })
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> &[String] {
        &self.incorrect_answers
    }

    /// Size of the answer set shown to the player.
    #[must_use]
    pub fn choice_count(&self) -> usize {
        self.incorrect_answers.len() + 1
    }

    /// Raw string comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    #[must_use]
    pub fn display_prompt(&self) -> String {
        decode_entities(&self.prompt)
    }

    #[must_use]
    pub fn display_category(&self) -> String {
        decode_entities(&self.category)
    }
}
