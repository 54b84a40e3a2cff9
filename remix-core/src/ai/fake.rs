//! Fake AI client for testing and offline demos.
//!
//! Responses are matched by checking if the prompt contains a registered
//! substring, so tests run without network access or API costs.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::client::{AiClient, AiError};
use super::types::{ChatRequest, ChatResponse, ImageRequest, ImageResponse, Usage};

/// A tiny transparent PNG, returned by default from `generate_image`.
pub const FAKE_IMAGE_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

#[derive(Debug, Clone)]
enum FakeReply {
    Content(String),
    Failure(String),
}

/// A fake AI client.
///
/// Patterns are checked in registration order (case-insensitive); the first
/// one contained in the prompt wins. Every call is counted and its prompt
/// recorded so tests can assert on what was sent.
#[derive(Debug)]
pub struct FakeAiClient {
    replies: Vec<(String, FakeReply)>,
    default_response: Option<String>,
    image: Result<String, String>,
    delay: Duration,
    completions: AtomicUsize,
    images: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl Default for FakeAiClient {
    fn default() -> Self {
        Self {
            replies: Vec::new(),
            default_response: None,
            image: Ok(FAKE_IMAGE_DATA_URI.to_string()),
            delay: Duration::ZERO,
            completions: AtomicUsize::new(0),
            images: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl FakeAiClient {
    /// Create a fake with no registered responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fake that returns `response` for prompts containing `prompt_contains`.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        Self::new().add_response(prompt_contains, response)
    }

    /// Add a response for prompts containing a specific substring.
    pub fn add_response(mut self, prompt_contains: &str, response: &str) -> Self {
        self.replies.push((
            prompt_contains.to_lowercase(),
            FakeReply::Content(response.to_string()),
        ));
        self
    }

    /// Fail completions whose prompt contains a specific substring.
    pub fn add_failure(mut self, prompt_contains: &str, message: &str) -> Self {
        self.replies.push((
            prompt_contains.to_lowercase(),
            FakeReply::Failure(message.to_string()),
        ));
        self
    }

    /// Set the response used when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Make every image call fail.
    pub fn with_failing_images(mut self, message: &str) -> Self {
        self.image = Err(message.to_string());
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Create a fake with canned responses for every built-in flow.
    pub fn with_recipe_responses() -> Self {
        Self::new()
            .add_response("culinary advisor", CANNED_VIABILITY)
            .add_response("recipe of the day", CANNED_RECIPE_OF_THE_DAY)
            .add_response("adapting and modifying recipes", CANNED_VARIATION)
            .with_default_response(CANNED_RECIPE)
    }

    /// Number of `complete` calls made so far.
    pub fn completion_calls(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    /// Number of `generate_image` calls made so far.
    pub fn image_calls(&self) -> usize {
        self.images.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, prompt: &str) {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(
        &self,
        _prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        self.completions.fetch_add(1, Ordering::SeqCst);
        let prompt = request.prompt_text();
        self.record(&prompt);
        self.pause().await;

        let prompt_lower = prompt.to_lowercase();
        let reply = self
            .replies
            .iter()
            .find(|(pattern, _)| prompt_lower.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone())
            .or_else(|| self.default_response.clone().map(FakeReply::Content));

        match reply {
            Some(FakeReply::Content(content)) => Ok(ChatResponse {
                content,
                usage: Usage::default(),
            }),
            Some(FakeReply::Failure(message)) => Err(AiError::RequestFailed(message)),
            None => Err(AiError::RequestFailed(format!(
                "FakeAiClient: No response configured for prompt (first 100 chars): {}",
                prompt.chars().take(100).collect::<String>()
            ))),
        }
    }

    async fn generate_image(
        &self,
        _prompt_name: &str,
        request: ImageRequest,
    ) -> Result<ImageResponse, AiError> {
        self.images.fetch_add(1, Ordering::SeqCst);
        self.record(&request.prompt);
        self.pause().await;

        match &self.image {
            Ok(url) => Ok(ImageResponse {
                image_url: url.clone(),
                usage: Usage::default(),
            }),
            Err(message) => Err(AiError::RequestFailed(message.clone())),
        }
    }
}

const CANNED_RECIPE: &str = r#"{
  "name": "Golden Buttermilk Pancakes",
  "ingredients": ["2 eggs", "1 1/2 cups all-purpose flour", "1 1/4 cups milk", "1 tbsp sugar", "2 tsp baking powder", "1 pinch salt"],
  "instructions": "1. Whisk the dry ingredients together.\n2. Beat the eggs into the milk and stir into the flour until just combined.\n3. Cook ladlefuls on a hot buttered griddle until bubbles form, then flip.",
  "difficulty": "Easy",
  "cookingTime": "25 minutes",
  "cuisine": "American",
  "nutritionalInfo": {"calories": "320", "protein": "11g", "carbs": "48g", "fat": "9g"}
}"#;

const CANNED_VARIATION: &str = r#"{
  "name": "Vegan Oat Milk Pancakes",
  "ingredients": ["1 1/2 cups all-purpose flour", "1 1/4 cups oat milk", "2 tbsp ground flaxseed", "1 tbsp maple syrup", "2 tsp baking powder"],
  "instructions": "1. Mix the flaxseed with water and rest 5 minutes.\n2. Combine everything into a smooth batter.\n3. Cook on an oiled griddle.",
  "difficulty": "Easy",
  "cookingTime": "30 minutes",
  "cuisine": "American",
  "nutritionalInfo": {"calories": "280", "protein": "7g", "carbs": "50g", "fat": "5g"}
}"#;

const CANNED_RECIPE_OF_THE_DAY: &str = r#"{
  "name": "Lemon Herb Orzo with Roasted Vegetables",
  "ingredients": ["1 cup orzo", "1 zucchini", "1 red pepper", "1 lemon", "2 tbsp olive oil", "fresh parsley"],
  "instructions": "1. Roast the chopped vegetables at 220C for 20 minutes.\n2. Cook the orzo.\n3. Toss everything with lemon, oil and parsley.",
  "difficulty": "Easy",
  "cookingTime": "35 minutes",
  "cuisine": "Mediterranean",
  "nutritionalInfo": {"calories": "410", "protein": "12g", "carbs": "62g", "fat": "13g"}
}"#;

const CANNED_VIABILITY: &str =
    r#"{"score": 8, "isViable": true, "feedback": "Coherent method and balanced ingredients."}"#;
