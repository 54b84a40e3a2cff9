//! AI client implementation using OpenRouter (OpenAI-compatible API).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::config::AiConfig;
use super::types::{ChatMessage, ChatRequest, ChatResponse, ImageRequest, ImageResponse, Usage};

#[derive(Error, Debug)]
pub enum AiError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("API call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Response contained no image")]
    NoImage,

    #[error("Configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl AiError {
    /// Whether the same call might succeed if repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::RequestFailed(_) | AiError::Timeout(_) | AiError::RateLimited { .. } => true,
            AiError::Api { status, .. } => *status >= 500,
            AiError::ParseError(_) | AiError::NoImage | AiError::Config(_) => false,
        }
    }
}

/// Trait for AI clients.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Complete a chat request.
    ///
    /// The `prompt_name` identifies the calling flow in logs.
    async fn complete(&self, prompt_name: &str, request: ChatRequest)
        -> Result<ChatResponse, AiError>;

    /// Generate a single image from a text prompt.
    async fn generate_image(
        &self,
        prompt_name: &str,
        request: ImageRequest,
    ) -> Result<ImageResponse, AiError>;
}

/// AI client with rate limiting and per-call timeouts, using OpenRouter.
pub struct OpenRouterClient {
    http: reqwest::Client,
    config: AiConfig,
    last_request: Arc<Mutex<Option<Instant>>>,
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modalities: Option<&'static [&'static str]>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    images: Vec<ResponseImage>,
}

#[derive(Debug, Deserialize)]
struct ResponseImage {
    image_url: ImageUrl,
}

#[derive(Debug, Deserialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Error response from the API.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

const IMAGE_MODALITIES: &[&str] = &["image", "text"];

impl OpenRouterClient {
    /// Create a new client from environment configuration.
    pub fn from_env() -> Result<Self, AiError> {
        let config = AiConfig::from_env()?;
        Self::new(config)
    }

    /// Create a new client with the given configuration.
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            config,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Apply rate limiting between requests.
    async fn rate_limit(&self) {
        if self.config.rate_limit_ms == 0 {
            return;
        }

        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            let min_interval = Duration::from_millis(self.config.rate_limit_ms);

            if elapsed < min_interval {
                tokio::time::sleep(min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    async fn post_completion(
        &self,
        prompt_name: &str,
        body: &CompletionBody<'_>,
    ) -> Result<CompletionResponse, AiError> {
        self.rate_limit().await;

        tracing::debug!(
            prompt_name = prompt_name,
            model = body.model,
            "Calling AI API"
        );

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(AiError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !(200..300).contains(&status) {
            // Try to parse error response
            if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&text) {
                return Err(AiError::Api {
                    status,
                    message: error_response.error.message,
                });
            }
            return Err(AiError::Api {
                status,
                message: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| AiError::ParseError(e.to_string()))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> AiError {
        if e.is_timeout() {
            AiError::Timeout(self.config.timeout)
        } else {
            AiError::RequestFailed(e.to_string())
        }
    }
}

#[async_trait]
impl AiClient for OpenRouterClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let body = CompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.json_response.then_some(ResponseFormat {
                format_type: "json_object",
            }),
            modalities: None,
        };

        let response = self.post_completion(prompt_name, &body).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AiError::ParseError("No text content in response".to_string()))?;

        Ok(ChatResponse {
            content,
            usage: response.usage.unwrap_or_default(),
        })
    }

    async fn generate_image(
        &self,
        prompt_name: &str,
        request: ImageRequest,
    ) -> Result<ImageResponse, AiError> {
        let messages = [ChatMessage::user(request.prompt)];
        let body = CompletionBody {
            model: &self.config.image_model,
            messages: &messages,
            max_tokens: None,
            temperature: None,
            response_format: None,
            modalities: Some(IMAGE_MODALITIES),
        };

        let response = self.post_completion(prompt_name, &body).await?;

        let image_url = response
            .choices
            .into_iter()
            .flat_map(|c| c.message.images)
            .map(|i| i.image_url.url)
            .find(|url| !url.is_empty())
            .ok_or(AiError::NoImage)?;

        Ok(ImageResponse {
            image_url,
            usage: response.usage.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_body_json_mode() {
        let messages = [ChatMessage::user("hi")];
        let body = CompletionBody {
            model: "m",
            messages: &messages,
            max_tokens: Some(10),
            temperature: None,
            response_format: Some(ResponseFormat {
                format_type: "json_object",
            }),
            modalities: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("temperature").is_none());
        assert!(json.get("modalities").is_none());
    }

    #[test]
    fn test_parse_image_response() {
        let raw = r#"{
            "choices": [{"message": {"content": "", "images": [
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
            ]}}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 7, "total_tokens": 12}
        }"#;

        let response: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            response.choices[0].message.images[0].image_url.url,
            "data:image/png;base64,AAAA"
        );
        assert_eq!(response.usage.unwrap().total_tokens, 12);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(AiError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(AiError::Api {
            status: 502,
            message: String::new()
        }
        .is_retryable());
        assert!(!AiError::Api {
            status: 400,
            message: String::new()
        }
        .is_retryable());
        assert!(!AiError::NoImage.is_retryable());
    }
}
