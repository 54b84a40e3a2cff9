//! Bounded retry with exponential backoff around any [`AiClient`].
//!
//! Flows never retry on their own; wrap the client instead when resilience
//! is wanted. Only errors that [`AiError::is_retryable`] are retried.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::client::{AiClient, AiError};
use super::types::{ChatRequest, ChatResponse, ImageRequest, ImageResponse};

/// Tunable parameters for the backoff strategy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound on the delay between attempts.
    pub max_backoff: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after attempt number `attempt` (1-based) fails.
    ///
    /// A rate-limit hint from the server takes precedence, still clamped to `max_backoff`.
    pub fn delay_after(&self, attempt: u32, error: &AiError) -> Duration {
        if let AiError::RateLimited {
            retry_after_secs: Some(secs),
        } = error
        {
            return Duration::from_secs(*secs).min(self.max_backoff);
        }

        let factor = self.multiplier.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Client wrapper that retries retryable failures.
pub struct RetryingAiClient {
    inner: Arc<dyn AiClient>,
    policy: RetryPolicy,
}

impl RetryingAiClient {
    pub fn new(inner: Arc<dyn AiClient>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    async fn run<T, F, Fut>(&self, prompt_name: &str, mut call: F) -> Result<T, AiError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, AiError>> + Send,
        T: Send,
    {
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.delay_after(attempt, &e);
                    tracing::warn!(
                        prompt_name = prompt_name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "AI call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl AiClient for RetryingAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        self.run(prompt_name, || self.inner.complete(prompt_name, request.clone()))
            .await
    }

    async fn generate_image(
        &self,
        prompt_name: &str,
        request: ImageRequest,
    ) -> Result<ImageResponse, AiError> {
        self.run(prompt_name, || {
            self.inner.generate_image(prompt_name, request.clone())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ChatMessage, FakeAiClient, Usage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails with the given error a fixed number of times, then succeeds.
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
        error: fn() -> AiError,
    }

    #[async_trait]
    impl AiClient for Flaky {
        async fn complete(&self, _: &str, _: ChatRequest) -> Result<ChatResponse, AiError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err((self.error)());
            }
            Ok(ChatResponse {
                content: "ok".to_string(),
                usage: Usage::default(),
            })
        }

        async fn generate_image(&self, _: &str, _: ImageRequest) -> Result<ImageResponse, AiError> {
            Err(AiError::NoImage)
        }
    }

    fn request() -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user("hi")],
            ..Default::default()
        }
    }

    #[test]
    fn test_backoff_grows_and_clamps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(350),
            multiplier: 2,
        };
        let err = AiError::Timeout(Duration::from_secs(1));
        assert_eq!(policy.delay_after(1, &err), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2, &err), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3, &err), Duration::from_millis(350));
        assert_eq!(policy.delay_after(30, &err), Duration::from_millis(350));
    }

    #[test]
    fn test_retry_after_hint() {
        let policy = RetryPolicy::default();
        let err = AiError::RateLimited {
            retry_after_secs: Some(2),
        };
        assert_eq!(policy.delay_after(1, &err), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let flaky = Arc::new(Flaky {
            failures: 2,
            calls: AtomicUsize::new(0),
            error: || AiError::RequestFailed("connection reset".to_string()),
        });
        let client = RetryingAiClient::new(flaky.clone(), RetryPolicy::default());

        let response = client.complete("test", request()).await.unwrap();
        assert_eq!(response.content, "ok");
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let flaky = Arc::new(Flaky {
            failures: 10,
            calls: AtomicUsize::new(0),
            error: || AiError::Timeout(Duration::from_secs(1)),
        });
        let client = RetryingAiClient::new(flaky.clone(), RetryPolicy::default());

        let err = client.complete("test", request()).await.unwrap_err();
        assert!(matches!(err, AiError::Timeout(_)));
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_errors() {
        let flaky = Arc::new(Flaky {
            failures: 10,
            calls: AtomicUsize::new(0),
            error: || AiError::Api {
                status: 401,
                message: "bad key".to_string(),
            },
        });
        let client = RetryingAiClient::new(flaky.clone(), RetryPolicy::default());

        assert!(client.complete("test", request()).await.is_err());
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_passes_through_success() {
        let fake = Arc::new(FakeAiClient::with_response("hi", "there"));
        let client = RetryingAiClient::new(fake.clone(), RetryPolicy::default());
        assert_eq!(client.complete("test", request()).await.unwrap().content, "there");
        assert_eq!(fake.completion_calls(), 1);
    }
}
