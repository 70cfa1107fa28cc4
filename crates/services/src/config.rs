use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(5);

/// Connection settings for the trivia provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Per-session rules: batch size, per-question time budget and tick period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizSettings {
    pub question_count: u32,
    pub time_limit_secs: u32,
    pub tick: Duration,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_count: 10,
            time_limit_secs: 15,
            tick: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriviaConfig {
    pub provider: ProviderConfig,
    pub min_request_interval: Duration,
    pub quiz: QuizSettings,
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            quiz: QuizSettings::default(),
        }
    }
}

impl TriviaConfig {
    /// Read overrides from the environment, falling back to defaults.
    ///
    /// Recognised variables: `TRIVIA_API_URL`, `TRIVIA_HTTP_TIMEOUT_SECS`,
    /// `TRIVIA_MIN_INTERVAL_MS`, `QUIZ_QUESTION_COUNT`, `QUIZ_TIME_LIMIT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = lookup("TRIVIA_API_URL")
            .filter(|raw| valid_api_url(raw))
            .map(|raw| raw.trim().to_owned())
            .unwrap_or(defaults.provider.base_url);
        let timeout = parsed(&lookup, "TRIVIA_HTTP_TIMEOUT_SECS")
            .map_or(defaults.provider.timeout, Duration::from_secs);
        let min_request_interval = parsed(&lookup, "TRIVIA_MIN_INTERVAL_MS")
            .map_or(defaults.min_request_interval, Duration::from_millis);
        let question_count = parsed(&lookup, "QUIZ_QUESTION_COUNT")
            .filter(|count| *count > 0)
            .unwrap_or(defaults.quiz.question_count);
        let time_limit_secs = parsed(&lookup, "QUIZ_TIME_LIMIT_SECS")
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.quiz.time_limit_secs);

        Self {
            provider: ProviderConfig { base_url, timeout },
            min_request_interval,
            quiz: QuizSettings {
                question_count,
                time_limit_secs,
                tick: defaults.quiz.tick,
            },
        }
    }
}

fn valid_api_url(raw: &str) -> bool {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => true,
        _ => {
            warn!(value = %raw, "ignoring TRIVIA_API_URL, expected an http(s) URL");
            false
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> TriviaConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        TriviaConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_match_reference_behaviour() {
        let config = config_from(&[]);
        assert_eq!(config.provider.base_url, DEFAULT_API_URL);
        assert_eq!(config.min_request_interval, Duration::from_secs(5));
        assert_eq!(config.quiz.question_count, 10);
        assert_eq!(config.quiz.time_limit_secs, 15);
        assert_eq!(config.quiz.tick, Duration::from_secs(1));
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("TRIVIA_API_URL", "http://localhost:8080/api.php"),
            ("TRIVIA_MIN_INTERVAL_MS", "250"),
            ("QUIZ_QUESTION_COUNT", "5"),
            ("QUIZ_TIME_LIMIT_SECS", "30"),
        ]);
        assert_eq!(config.provider.base_url, "http://localhost:8080/api.php");
        assert_eq!(config.min_request_interval, Duration::from_millis(250));
        assert_eq!(config.quiz.question_count, 5);
        assert_eq!(config.quiz.time_limit_secs, 30);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("TRIVIA_HTTP_TIMEOUT_SECS", "soon"),
            ("QUIZ_QUESTION_COUNT", "0"),
            ("QUIZ_TIME_LIMIT_SECS", "-3"),
            ("TRIVIA_API_URL", "opentdb.com/api.php"),
        ]);
        assert_eq!(config.provider.base_url, DEFAULT_API_URL);
        assert_eq!(config.provider.timeout, Duration::from_secs(10));
        assert_eq!(config.quiz.question_count, 10);
        assert_eq!(config.quiz.time_limit_secs, 15);
    }
}
