use finwell_server::ai::{ChatTurn, CompletionProvider, HttpCompletionProvider};
use finwell_server::error::{AppError, ProviderError};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn turns() -> Vec<ChatTurn> {
    vec![ChatTurn {
        role: "user".to_string(),
        content: "How do I start a budget?".to_string(),
    }]
}

#[test_log::test(tokio::test)]
async fn test_complete_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "type": "text", "text": "Track your spending for a month first." }
            ]
        })))
        .mount(&server)
        .await;

    let provider = HttpCompletionProvider::new(&server.uri(), "test-model".into(), 64).unwrap();
    let reply = provider
        .complete("sk-test", "You are a coach.", &turns())
        .await
        .unwrap();

    assert_eq!(reply, "Track your spending for a month first.");
}

#[tokio::test]
async fn test_complete_joins_multiple_text_blocks() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "type": "text", "text": "Part one. " },
                { "type": "text", "text": "Part two." }
            ]
        })))
        .mount(&server)
        .await;

    let provider = HttpCompletionProvider::new(&server.uri(), "test-model".into(), 64).unwrap();
    let reply = provider
        .complete("sk-test", "system", &turns())
        .await
        .unwrap();

    assert_eq!(reply, "Part one. Part two.");
}

#[tokio::test]
async fn test_complete_maps_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let provider = HttpCompletionProvider::new(&server.uri(), "test-model".into(), 64).unwrap();
    let err = provider
        .complete("sk-bad", "system", &turns())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::ProviderError(ProviderError::InvalidApiKey)
    ));
}

#[tokio::test]
async fn test_complete_maps_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = HttpCompletionProvider::new(&server.uri(), "test-model".into(), 64).unwrap();
    let err = provider
        .complete("sk-test", "system", &turns())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::ProviderError(ProviderError::RateLimited)
    ));
}

#[tokio::test]
async fn test_complete_rejects_empty_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
        .mount(&server)
        .await;

    let provider = HttpCompletionProvider::new(&server.uri(), "test-model".into(), 64).unwrap();
    let err = provider
        .complete("sk-test", "system", &turns())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::ProviderError(ProviderError::ResponseError(_))
    ));
}

#[tokio::test]
async fn test_complete_maps_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = HttpCompletionProvider::new(&server.uri(), "test-model".into(), 64).unwrap();
    let err = provider
        .complete("sk-test", "system", &turns())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::ProviderError(ProviderError::RequestFailed(_))
    ));
}
