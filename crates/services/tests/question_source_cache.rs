mod common;

use std::sync::Arc;
use std::time::Duration;

use services::{ProviderError, QuestionSource, ScriptedResponse, SourceError};
use tokio::time::Instant;
use trivia_core::model::Difficulty;

use common::{category, questions, scripted, source_for};

#[tokio::test(start_paused = true)]
async fn identical_requests_hit_the_cache() {
    let provider = scripted([ScriptedResponse::Questions(questions(10))]);
    let source = source_for(&provider);
    let history = category("History");

    let first = source
        .fetch_batch(&history, Difficulty::Hard, 10)
        .await
        .unwrap();
    let started = Instant::now();
    let second = source
        .fetch_batch(&history, Difficulty::Hard, 10)
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(provider.call_count(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(source.cached_batches(), 1);
}

#[tokio::test(start_paused = true)]
async fn distinct_requests_are_spaced_by_the_minimum_interval() {
    let provider = scripted([
        ScriptedResponse::Questions(questions(10)),
        ScriptedResponse::Questions(questions(10)),
        ScriptedResponse::Questions(questions(5)),
    ]);
    let source = source_for(&provider);
    let history = category("History");

    source
        .fetch_batch(&history, Difficulty::Hard, 10)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    source
        .fetch_batch(&history, Difficulty::Easy, 10)
        .await
        .unwrap();
    source
        .fetch_batch(&category("Animals"), Difficulty::Easy, 5)
        .await
        .unwrap();

    let calls = provider.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[1].at - calls[0].at >= Duration::from_secs(5));
    assert!(calls[2].at - calls[1].at >= Duration::from_secs(5));
    assert_eq!(calls[1].request.difficulty, Difficulty::Easy);
    assert_eq!(calls[2].request.category.provider_id(), 27);
}

#[tokio::test(start_paused = true)]
async fn requests_after_the_interval_are_not_delayed() {
    let provider = scripted([ScriptedResponse::Questions(questions(10))]);
    let source = source_for(&provider);

    source
        .fetch_batch(&category("Sports"), Difficulty::Easy, 10)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;

    let before = Instant::now();
    source
        .fetch_batch(&category("Sports"), Difficulty::Medium, 10)
        .await
        .unwrap();
    assert_eq!(before.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn custom_interval_is_honoured() {
    let provider = scripted([ScriptedResponse::Questions(questions(3))]);
    let source = QuestionSource::new(provider.clone()).with_min_interval(Duration::from_millis(500));

    source
        .fetch_batch(&category("Geography"), Difficulty::Easy, 3)
        .await
        .unwrap();
    source
        .fetch_batch(&category("Geography"), Difficulty::Hard, 3)
        .await
        .unwrap();

    let calls = provider.calls();
    let gap = calls[1].at - calls[0].at;
    assert!(gap >= Duration::from_millis(500));
    assert!(gap < Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn concurrent_identical_misses_issue_one_request() {
    let provider = Arc::new(
        services::ScriptedProvider::new([ScriptedResponse::Questions(questions(10))])
            .with_latency(Duration::from_secs(1)),
    );
    let source = source_for(&provider);
    let history = category("History");

    let (a, b) = tokio::join!(
        source.fetch_batch(&history, Difficulty::Medium, 10),
        source.fetch_batch(&history, Difficulty::Medium, 10),
    );

    assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn provider_failures_surface_distinct_reasons() {
    let provider = scripted([
        ScriptedResponse::Code(1),
        ScriptedResponse::Code(2),
        ScriptedResponse::Code(3),
        ScriptedResponse::Code(4),
        ScriptedResponse::Code(9),
        ScriptedResponse::Status(429),
        ScriptedResponse::Status(503),
    ]);
    let source = source_for(&provider);
    let history = category("History");

    let mut messages = Vec::new();
    for _ in 0..7 {
        let err = source
            .fetch_batch(&history, Difficulty::Hard, 10)
            .await
            .unwrap_err();
        messages.push(err.to_string());
        if let SourceError::Provider(ProviderError::Other(code)) = err {
            assert_eq!(code, 9);
        }
    }

    assert!(messages[0].contains("insufficient questions"));
    assert!(messages[1].contains("invalid parameters"));
    assert!(messages[2].contains("unknown session token"));
    assert!(messages[3].contains("session token exhausted"));
    assert_eq!(messages[4], "API error 9");
    assert!(messages[5].contains("rate limited"));
    assert!(messages[6].contains("503"));
    assert_eq!(source.cached_batches(), 0);
}
