//! Shared error types for the services crate.

use thiserror::Error;

/// Non-zero `response_code` values returned by the trivia provider.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("insufficient questions: the provider does not have enough questions for this query")]
    InsufficientQuestions,
    #[error("invalid parameters: the provider rejected the request arguments")]
    InvalidParameters,
    #[error("unknown session token")]
    UnknownToken,
    #[error("session token exhausted: all questions for this query have been returned")]
    TokenExhausted,
    #[error("API error {0}")]
    Other(i64),
}

impl ProviderError {
    /// Map a non-zero response code to its failure reason.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::InsufficientQuestions,
            2 => Self::InvalidParameters,
            3 => Self::UnknownToken,
            4 => Self::TokenExhausted,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::InsufficientQuestions => 1,
            Self::InvalidParameters => 2,
            Self::UnknownToken => 3,
            Self::TokenExhausted => 4,
            Self::Other(code) => code,
        }
    }
}

/// Coarse classification of a `SourceError` for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    RateLimited,
    Provider,
    Invalid,
}

/// Errors emitted by `QuestionSource` and `TriviaProvider` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("question count must be at least 1")]
    EmptyRequest,
    #[error("rate limited by the trivia provider, retry after waiting")]
    RateLimited,
    #[error("trivia provider request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl SourceError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RateLimited => FailureKind::RateLimited,
            Self::HttpStatus(_) | Self::Network(_) => FailureKind::Network,
            Self::Provider(_) => FailureKind::Provider,
            Self::EmptyRequest | Self::Decode(_) => FailureKind::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_specific_reasons() {
        assert_eq!(ProviderError::from_code(1), ProviderError::InsufficientQuestions);
        assert_eq!(ProviderError::from_code(2), ProviderError::InvalidParameters);
        assert_eq!(ProviderError::from_code(3), ProviderError::UnknownToken);
        assert_eq!(ProviderError::from_code(4), ProviderError::TokenExhausted);
        assert!(
            ProviderError::InsufficientQuestions
                .to_string()
                .contains("insufficient questions")
        );
    }

    #[test]
    fn unknown_codes_fall_back_to_generic_message() {
        let err = ProviderError::from_code(5);
        assert_eq!(err, ProviderError::Other(5));
        assert_eq!(err.to_string(), "API error 5");
        assert_eq!(err.code(), 5);
    }

    #[test]
    fn kinds_follow_failure_taxonomy() {
        assert_eq!(SourceError::RateLimited.kind(), FailureKind::RateLimited);
        assert_eq!(
            SourceError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY).kind(),
            FailureKind::Network
        );
        assert_eq!(
            SourceError::from(ProviderError::TokenExhausted).kind(),
            FailureKind::Provider
        );
        assert_eq!(SourceError::EmptyRequest.kind(), FailureKind::Invalid);
    }
}
