//! Transport seam between `QuestionSource` and the remote trivia provider.

mod opentdb;
mod scripted;
mod wire;

use async_trait::async_trait;
use trivia_core::model::{Category, Difficulty, Question};

use crate::error::SourceError;

pub use opentdb::OpenTdbClient;
pub use scripted::{RecordedCall, ScriptedProvider, ScriptedResponse};
pub use wire::{ApiQuestion, ApiResponse};

/// Question type requested from the provider. Only multiple choice is supported.
pub const QUESTION_TYPE: &str = "multiple";

/// Parameters for one outbound batch request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchRequest {
    pub category: Category,
    pub difficulty: Difficulty,
    pub amount: u32,
}

/// A source of raw question batches, one network round-trip per call.
#[async_trait]
pub trait TriviaProvider: Send + Sync {
    /// Fetch a batch of questions.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` for transport failures, non-success HTTP statuses,
    /// malformed bodies, and non-zero provider response codes.
    async fn fetch_questions(&self, request: &BatchRequest) -> Result<Vec<Question>, SourceError>;
}
