//! Shared plumbing for prompt flows: render, call, validate.

use std::fmt;

use crate::ai::{AiClient, ChatMessage, ChatRequest, ImageRequest};
use crate::error::GenerationError;
use crate::schema::OutputSchema;

/// Stages a single flow invocation moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    Rendering,
    AwaitingBackend,
    Validating,
    Success,
    Failed,
}

impl FlowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStage::Rendering => "rendering",
            FlowStage::AwaitingBackend => "awaiting_backend",
            FlowStage::Validating => "validating",
            FlowStage::Success => "success",
            FlowStage::Failed => "failed",
        }
    }
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn enter(prompt_name: &str, stage: FlowStage) {
    tracing::debug!(prompt_name = prompt_name, stage = %stage, "Flow stage");
}

/// Sampling parameters for one JSON completion.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sampling {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Send an already-rendered prompt and validate the reply against `S`.
pub(crate) async fn complete_json<S: OutputSchema>(
    ai_client: &dyn AiClient,
    prompt_name: &str,
    prompt: String,
    sampling: Sampling,
) -> Result<S::Output, GenerationError> {
    let request = ChatRequest {
        messages: vec![ChatMessage::user(prompt)],
        json_response: true,
        max_tokens: Some(sampling.max_tokens),
        temperature: Some(sampling.temperature),
    };

    enter(prompt_name, FlowStage::AwaitingBackend);
    let response = match ai_client.complete(prompt_name, request).await {
        Ok(r) => r,
        Err(e) => {
            enter(prompt_name, FlowStage::Failed);
            return Err(e.into());
        }
    };

    enter(prompt_name, FlowStage::Validating);
    match S::validate(&response.content) {
        Ok(output) => {
            enter(prompt_name, FlowStage::Success);
            tracing::debug!(
                prompt_name = prompt_name,
                schema = S::NAME,
                total_tokens = response.usage.total_tokens,
                "Backend output validated"
            );
            Ok(output)
        }
        Err(e) => {
            enter(prompt_name, FlowStage::Failed);
            tracing::warn!(
                prompt_name = prompt_name,
                schema = S::NAME,
                error = %e,
                "Backend output failed validation"
            );
            Err(e.into())
        }
    }
}

/// Render `prompt` via `render`, logging the rendering stage.
pub(crate) fn render(prompt_name: &str, render: impl FnOnce() -> String) -> String {
    enter(prompt_name, FlowStage::Rendering);
    render()
}

/// Generate an image and return its URL.
pub(crate) async fn generate_image(
    ai_client: &dyn AiClient,
    prompt_name: &str,
    prompt: String,
) -> Result<String, GenerationError> {
    enter(prompt_name, FlowStage::AwaitingBackend);
    match ai_client
        .generate_image(prompt_name, ImageRequest { prompt })
        .await
    {
        Ok(image) => {
            enter(prompt_name, FlowStage::Success);
            Ok(image.image_url)
        }
        Err(e) => {
            enter(prompt_name, FlowStage::Failed);
            Err(e.into())
        }
    }
}
