use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::error;
use url::Url;

use crate::error::{AppError, ProviderError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Chat completion backend. The HTTP implementation talks to the Anthropic
/// Messages API; tests swap in a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        system: &str,
        turns: &[ChatTurn],
    ) -> Result<String, AppError>;
}

pub struct HttpCompletionProvider {
    client: reqwest::Client,
    base_url: Url,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [ChatTurn],
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl HttpCompletionProvider {
    pub fn new(base_url: &str, model: String, max_tokens: u32) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid provider base URL: {}", e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            model,
            max_tokens,
        })
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionProvider {
    async fn complete(
        &self,
        api_key: &str,
        system: &str,
        turns: &[ChatTurn],
    ) -> Result<String, AppError> {
        let url = self
            .base_url
            .join("/v1/messages")
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: turns,
        };

        let response = self
            .client
            .post(url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ProviderError(ProviderError::RequestFailed(e.to_string())))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AppError::ProviderError(ProviderError::InvalidApiKey));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(AppError::ProviderError(ProviderError::RateLimited));
            }
            status => {
                error!("Provider returned unexpected status {}", status);
                return Err(AppError::ProviderError(ProviderError::RequestFailed(
                    format!("unexpected status {}", status),
                )));
            }
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AppError::ProviderError(ProviderError::ResponseError(e.to_string())))?;

        let text = parsed
            .content
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(AppError::ProviderError(ProviderError::ResponseError(
                "response contained no text content".into(),
            )));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mocked_provider_round_trip() {
        let mut mock = MockCompletionProvider::new();
        mock.expect_complete()
            .returning(|_, _, _| Ok("canned reply".to_string()));

        let reply = mock
            .complete("key", "system", &[])
            .await
            .expect("mock should answer");
        assert_eq!(reply, "canned reply");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = HttpCompletionProvider::new("not a url", "model".into(), 64);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_valid_base_url_accepted() {
        assert!(HttpCompletionProvider::new("http://localhost:9999", "model".into(), 64).is_ok());
    }
}
