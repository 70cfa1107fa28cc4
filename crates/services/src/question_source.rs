use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};
use trivia_core::model::{Category, Difficulty, Question};

use crate::config::DEFAULT_MIN_REQUEST_INTERVAL;
use crate::error::SourceError;
use crate::provider::{BatchRequest, TriviaProvider};

pub type Batch = Arc<[Question]>;

/// Resolves `(category, difficulty, count)` to a question batch.
///
/// Successful batches are cached for the lifetime of the instance and never
/// expire. Cache misses are throttled so that outbound requests are at least
/// `min_interval` apart.
pub struct QuestionSource {
    provider: Arc<dyn TriviaProvider>,
    min_interval: Duration,
    cache: Mutex<HashMap<BatchRequest, Batch>>,
    // Held for the whole wait + request so outbound calls are serialised.
    last_request: tokio::sync::Mutex<Option<Instant>>,
}

impl QuestionSource {
    #[must_use]
    pub fn new(provider: Arc<dyn TriviaProvider>) -> Self {
        Self {
            provider,
            min_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            cache: Mutex::new(HashMap::new()),
            last_request: tokio::sync::Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Number of batches currently cached.
    #[must_use]
    pub fn cached_batches(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Fetch a batch, serving repeated keys from the cache.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::EmptyRequest` when `count` is zero, and propagates
    /// provider failures unchanged. Failures are never cached.
    pub async fn fetch_batch(
        &self,
        category: &Category,
        difficulty: Difficulty,
        count: u32,
    ) -> Result<Batch, SourceError> {
        if count == 0 {
            return Err(SourceError::EmptyRequest);
        }

        let key = BatchRequest {
            category: category.clone(),
            difficulty,
            amount: count,
        };

        if let Some(hit) = self.cached(&key) {
            debug!(category = %category, %difficulty, count, "question cache hit");
            return Ok(hit);
        }

        let mut last_request = self.last_request.lock().await;

        // Another caller may have filled this key while we waited for the lock.
        if let Some(hit) = self.cached(&key) {
            debug!(category = %category, %difficulty, count, "question cache filled while waiting");
            return Ok(hit);
        }

        if let Some(last) = *last_request {
            let ready_at = last + self.min_interval;
            let now = Instant::now();
            if now < ready_at {
                debug!(wait = ?(ready_at - now), "throttling provider request");
                tokio::time::sleep_until(ready_at).await;
            }
        }

        info!(
            category = category.provider_id(),
            %difficulty,
            amount = count,
            "requesting questions from provider"
        );
        *last_request = Some(Instant::now());

        match self.provider.fetch_questions(&key).await {
            Ok(questions) => {
                if questions.len() < count as usize {
                    warn!(
                        requested = count,
                        received = questions.len(),
                        "provider returned a short batch"
                    );
                }
                let batch: Batch = questions.into();
                self.cache
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key, Arc::clone(&batch));
                Ok(batch)
            }
            Err(err) => {
                warn!(error = %err, "question fetch failed");
                Err(err)
            }
        }
    }

    fn cached(&self, key: &BatchRequest) -> Option<Batch> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ScriptedProvider, ScriptedResponse};
    use trivia_core::model::CategoryCatalog;

    fn question(n: usize) -> Question {
        Question::new(
            "History",
            Difficulty::Easy,
            format!("Question {n}"),
            "Right",
            vec!["Wrong".into()],
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn zero_count_is_rejected_without_a_request() {
        let provider = Arc::new(ScriptedProvider::default());
        let source = QuestionSource::new(provider.clone());
        let history = CategoryCatalog::reference().find("History").unwrap().clone();

        let err = source
            .fetch_batch(&history, Difficulty::Easy, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::EmptyRequest));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_not_cached() {
        let provider = Arc::new(ScriptedProvider::new([
            ScriptedResponse::Status(429),
            ScriptedResponse::Questions(vec![question(1)]),
        ]));
        let source = QuestionSource::new(provider.clone());
        let history = CategoryCatalog::reference().find("History").unwrap().clone();

        let err = source
            .fetch_batch(&history, Difficulty::Easy, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::RateLimited));
        assert_eq!(source.cached_batches(), 0);

        let batch = source.fetch_batch(&history, Difficulty::Easy, 1).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(provider.call_count(), 2);
        assert_eq!(source.cached_batches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn short_batches_are_returned_as_is() {
        let provider = Arc::new(ScriptedProvider::new([ScriptedResponse::Questions(vec![
            question(1),
            question(2),
        ])]));
        let source = QuestionSource::new(provider);
        let animals = CategoryCatalog::reference().find("Animals").unwrap().clone();

        let batch = source.fetch_batch(&animals, Difficulty::Medium, 10).await.unwrap();
        assert_eq!(batch.len(), 2);
    }
}
