use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};
use trivia_core::model::Question;

use super::wire::ApiResponse;
use super::{BatchRequest, QUESTION_TYPE, TriviaProvider};
use crate::config::ProviderConfig;
use crate::error::SourceError;

/// HTTP client for the Open Trivia Database.
#[derive(Clone, Debug)]
pub struct OpenTdbClient {
    client: Client,
    config: ProviderConfig,
}

impl OpenTdbClient {
    /// # Errors
    ///
    /// Returns `SourceError::Network` if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[async_trait]
impl TriviaProvider for OpenTdbClient {
    #[instrument(
        skip(self, request),
        fields(
            category = request.category.provider_id(),
            difficulty = %request.difficulty,
            amount = request.amount,
        )
    )]
    async fn fetch_questions(&self, request: &BatchRequest) -> Result<Vec<Question>, SourceError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("amount", request.amount.to_string()),
                ("category", request.category.provider_id().to_string()),
                ("difficulty", request.difficulty.as_str().to_owned()),
                ("type", QUESTION_TYPE.to_owned()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            return Err(SourceError::HttpStatus(status));
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "received provider response");
        let parsed: ApiResponse = serde_json::from_slice(&body)?;
        parsed.into_questions()
    }
}
