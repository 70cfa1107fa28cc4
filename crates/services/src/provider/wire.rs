use serde::Deserialize;
use tracing::warn;
use trivia_core::model::{Difficulty, Question};

use crate::error::{ProviderError, SourceError};

/// Response body returned by the provider's `api.php` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub response_code: i64,
    #[serde(default)]
    pub results: Vec<ApiQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiQuestion {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl ApiResponse {
    /// Validate the response code and convert results into domain questions.
    ///
    /// Results that break question invariants are dropped, so the returned
    /// batch may be shorter than `results`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Provider` when `response_code` is non-zero.
    pub fn into_questions(self) -> Result<Vec<Question>, SourceError> {
        if self.response_code != 0 {
            return Err(ProviderError::from_code(self.response_code).into());
        }

        let mut questions = Vec::with_capacity(self.results.len());
        for raw in self.results {
            match Question::new(
                raw.category,
                raw.difficulty,
                raw.question,
                raw.correct_answer,
                raw.incorrect_answers,
            ) {
                Ok(question) => questions.push(question),
                Err(err) => warn!(error = %err, kind = %raw.kind, "skipping invalid provider question"),
            }
        }
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS: &str = r#"{
        "response_code": 0,
        "results": [
            {
                "category": "History",
                "type": "multiple",
                "difficulty": "hard",
                "question": "Which year did the Western Roman Empire fall?",
                "correct_answer": "476",
                "incorrect_answers": ["410", "455", "493"]
            },
            {
                "category": "History",
                "type": "multiple",
                "difficulty": "hard",
                "question": "Broken entry",
                "correct_answer": "A",
                "incorrect_answers": ["A", "B", "C"]
            }
        ]
    }"#;

    #[test]
    fn success_response_yields_valid_questions() {
        let response: ApiResponse = serde_json::from_str(SUCCESS).unwrap();
        let questions = response.into_questions().unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer(), "476");
        assert_eq!(questions[0].difficulty(), Difficulty::Hard);
        assert_eq!(questions[0].choice_count(), 4);
    }

    #[test]
    fn non_zero_code_maps_to_provider_error() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"response_code": 1, "results": []}"#).unwrap();
        let err = response.into_questions().unwrap_err();
        assert!(matches!(
            err,
            SourceError::Provider(ProviderError::InsufficientQuestions)
        ));
    }

    #[test]
    fn missing_results_are_tolerated_on_failure_codes() {
        let response: ApiResponse = serde_json::from_str(r#"{"response_code": 7}"#).unwrap();
        let err = response.into_questions().unwrap_err();
        assert_eq!(err.to_string(), "API error 7");
    }
}
