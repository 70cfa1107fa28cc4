mod common;

use std::time::Duration;

use services::{
    BatchRequest, FailureKind, OpenTdbClient, ProviderConfig, ProviderError, SourceError,
    TriviaProvider,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use trivia_core::model::Difficulty;

use common::category;

const TWO_QUESTIONS: &str = r#"{
  "response_code": 0,
  "results": [
    {
      "category": "History",
      "type": "multiple",
      "difficulty": "hard",
      "question": "Which year did the Berlin Wall fall?",
      "correct_answer": "1989",
      "incorrect_answers": ["1987", "1991", "1985"]
    },
    {
      "category": "History",
      "type": "multiple",
      "difficulty": "hard",
      "question": "Who was &quot;The Iron Lady&quot;?",
      "correct_answer": "Margaret Thatcher",
      "incorrect_answers": ["Golda Meir", "Indira Gandhi", "Angela Merkel"]
    }
  ]
}"#;

/// Serve exactly one HTTP response and hand back the raw request text.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let read = socket.read(&mut buf).await.unwrap();
        let request = String::from_utf8_lossy(&buf[..read]).into_owned();

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{addr}/api.php"), handle)
}

fn client(base_url: String) -> OpenTdbClient {
    OpenTdbClient::new(ProviderConfig {
        base_url,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn history_hard(amount: u32) -> BatchRequest {
    BatchRequest {
        category: category("History"),
        difficulty: Difficulty::Hard,
        amount,
    }
}

#[tokio::test]
async fn sends_query_and_parses_multiple_choice_results() {
    let (url, server) = serve_once("200 OK", TWO_QUESTIONS).await;

    let questions = client(url).fetch_questions(&history_hard(10)).await.unwrap();
    let request = server.await.unwrap();

    assert!(
        request.starts_with("GET /api.php?amount=10&category=23&difficulty=hard&type=multiple "),
        "unexpected request line: {request}"
    );
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].correct_answer(), "1989");
    assert_eq!(questions[0].incorrect_answers().len(), 3);
    assert_eq!(questions[1].prompt(), "Who was &quot;The Iron Lady&quot;?");
    assert_eq!(questions[1].display_prompt(), "Who was \"The Iron Lady\"?");
}

#[tokio::test]
async fn provider_code_becomes_an_error() {
    let (url, server) = serve_once("200 OK", r#"{"response_code":1,"results":[]}"#).await;

    let err = client(url).fetch_questions(&history_hard(50)).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(
        err,
        SourceError::Provider(ProviderError::InsufficientQuestions)
    ));
    assert_eq!(err.kind(), FailureKind::Provider);
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let (url, server) = serve_once("429 Too Many Requests", "{}").await;

    let err = client(url).fetch_questions(&history_hard(10)).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, SourceError::RateLimited));
    assert_eq!(err.kind(), FailureKind::RateLimited);
}

#[tokio::test]
async fn server_errors_report_the_status() {
    let (url, server) = serve_once("500 Internal Server Error", "oops").await;

    let err = client(url).fetch_questions(&history_hard(10)).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, SourceError::HttpStatus(status) if status.as_u16() == 500));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (url, server) = serve_once("200 OK", "<html>maintenance</html>").await;

    let err = client(url).fetch_questions(&history_hard(10)).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, SourceError::Decode(_)));
    assert_eq!(err.kind(), FailureKind::Invalid);
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}/api.php"))
        .fetch_questions(&history_hard(10))
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Network(_)));
    assert_eq!(err.kind(), FailureKind::Network);
}
