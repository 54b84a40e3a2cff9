//! AI backend access and the recipe prompt flows built on it.
//!
//! This module provides:
//! - `AiClient` trait for abstracting AI providers
//! - `OpenRouterClient` for the hosted backend and `FakeAiClient` for tests
//! - `RetryingAiClient`, an opt-in retry wrapper
//! - One flow per task: render a prompt, call the backend, validate the output
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `OPENROUTER_API_KEY` (required for OpenRouter): Your OpenRouter API key
//! - `REMIX_AI_PROVIDER` (optional): "openrouter" or "fake"
//! - `REMIX_AI_MODEL` (optional): Text model name
//! - `REMIX_AI_IMAGE_MODEL` (optional): Image model name
//! - `REMIX_AI_MAX_ATTEMPTS` (optional): Attempts per backend call
//!
//! # Example
//!
//! ```ignore
//! use remix_core::ai::{create_client_from_env, generate_recipe, FlowConfig};
//!
//! let client = create_client_from_env()?;
//! let ingredients = vec!["eggs".to_string(), "spinach".to_string()];
//! let recipe = generate_recipe(client.as_ref(), &FlowConfig::default(), &ingredients, None).await?;
//! println!("{}", recipe.name);
//! ```

mod client;
mod config;
mod fake;
mod flow;
mod generate_recipe;
pub mod prompts;
mod recipe_image;
mod recipe_of_the_day;
mod recipe_variation;
mod retry;
mod types;
mod viability;

use std::sync::Arc;

pub use client::{AiClient, AiError, OpenRouterClient};
pub use config::{AiConfig, ConfigError, FlowConfig, ProviderKind};
pub use fake::{FakeAiClient, FAKE_IMAGE_DATA_URI};
pub use flow::FlowStage;
pub use generate_recipe::generate_recipe;
pub use recipe_image::generate_recipe_image;
pub use recipe_of_the_day::{generate_recipe_of_the_day, RecipeOfTheDayFlow};
pub use recipe_variation::generate_recipe_variation;
pub use retry::{RetryPolicy, RetryingAiClient};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, ImageRequest, ImageResponse, Role, Usage,
};
pub use viability::{assess_recipe_viability, check_recipe_viability};

/// Build the client described by `config`.
///
/// The fake provider answers every flow with canned recipes. When
/// `max_attempts` is above one the client is wrapped in [`RetryingAiClient`].
pub fn create_client(config: AiConfig) -> Result<Arc<dyn AiClient>, AiError> {
    let policy = RetryPolicy {
        max_attempts: config.max_attempts,
        initial_backoff: config.initial_backoff,
        ..Default::default()
    };

    let provider = config.provider;
    let client: Arc<dyn AiClient> = match provider {
        ProviderKind::Fake => Arc::new(FakeAiClient::with_recipe_responses()),
        ProviderKind::OpenRouter => Arc::new(OpenRouterClient::new(config)?),
    };

    tracing::info!(
        provider = ?provider,
        max_attempts = policy.max_attempts,
        "AI client ready"
    );

    if policy.max_attempts > 1 {
        Ok(Arc::new(RetryingAiClient::new(client, policy)))
    } else {
        Ok(client)
    }
}

/// Build a client from environment configuration.
pub fn create_client_from_env() -> Result<Arc<dyn AiClient>, AiError> {
    create_client(AiConfig::from_env()?)
}
