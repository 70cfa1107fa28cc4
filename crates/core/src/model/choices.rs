use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::Question;
use crate::text::decode_entities;

/// One button in the answer set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerChoice {
    text: String,
    is_correct: bool,
}

impl AnswerChoice {
    /// Raw provider text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn display_text(&self) -> String {
        decode_entities(&self.text)
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

/// The permuted answer set for the active question.
///
/// Choices are addressed by position. Two distractors with identical text stay
/// distinct entries, so a selection never highlights more than one button.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerChoices {
    choices: Vec<AnswerChoice>,
}

impl AnswerChoices {
    /// Combine the correct and incorrect answers and permute them with `rng`.
    pub fn shuffled<R>(question: &Question, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut choices: Vec<AnswerChoice> = question
            .incorrect_answers()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(question.correct_answer()))
            .map(|text| AnswerChoice {
                is_correct: question.is_correct(text),
                text: text.to_owned(),
            })
            .collect();
        choices.shuffle(rng);
        Self { choices }
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&AnswerChoice> {
        self.choices.get(position)
    }

    /// Position of the correct answer in this permutation.
    #[must_use]
    pub fn correct_position(&self) -> Option<usize> {
        self.choices.iter().position(AnswerChoice::is_correct)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnswerChoice> {
        self.choices.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}
