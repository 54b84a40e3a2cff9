//! AI and flow configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::types::ViabilitySchemaVersion;

/// Default OpenRouter base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model for recipe text.
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";

/// Default model for recipe images.
pub const DEFAULT_IMAGE_MODEL: &str = "google/gemini-2.5-flash-image-preview";

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default initial retry backoff in milliseconds.
pub const DEFAULT_BACKOFF_MS: u64 = 500;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Which backend implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenRouter,
    Fake,
}

/// AI client configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: ProviderKind,
    /// API key for OpenRouter. Empty for the fake provider.
    pub api_key: String,
    /// Model for text generation (e.g., "google/gemini-2.0-flash-001").
    pub model: String,
    /// Model for image generation.
    pub image_model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Timeout applied to each backend call.
    pub timeout: Duration,
    /// Milliseconds to wait between requests.
    pub rate_limit_ms: u64,
    /// Total attempts per call; values above 1 enable retries.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenRouter,
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rate_limit_ms: 0,
            max_attempts: 1,
            initial_backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
        }
    }
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `REMIX_AI_PROVIDER`: "openrouter" (default) or "fake"
    /// - `REMIX_AI_MODEL`: Text model name
    /// - `REMIX_AI_IMAGE_MODEL`: Image model name
    /// - `REMIX_AI_BASE_URL`: API base URL (default: "https://openrouter.ai/api/v1")
    /// - `REMIX_AI_TIMEOUT_SECS`: Per-call timeout (default: 60)
    /// - `REMIX_AI_RATE_LIMIT_MS`: Delay between requests (default: 0)
    /// - `REMIX_AI_MAX_ATTEMPTS`: Attempts per call (default: 1)
    /// - `REMIX_AI_BACKOFF_MS`: Initial retry backoff (default: 500)
    ///
    /// Required for the OpenRouter provider:
    /// - `OPENROUTER_API_KEY`
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match env::var("REMIX_AI_PROVIDER")
            .unwrap_or_else(|_| "openrouter".to_string())
            .as_str()
        {
            "openrouter" => ProviderKind::OpenRouter,
            "fake" => ProviderKind::Fake,
            other => {
                return Err(ConfigError::InvalidValue {
                    name: "REMIX_AI_PROVIDER".to_string(),
                    value: other.to_string(),
                })
            }
        };

        let api_key = match provider {
            ProviderKind::OpenRouter => env::var("OPENROUTER_API_KEY")
                .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?,
            ProviderKind::Fake => String::new(),
        };

        let model = env::var("REMIX_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let image_model =
            env::var("REMIX_AI_IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string());
        let base_url =
            env::var("REMIX_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = Duration::from_secs(parse_env("REMIX_AI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?);
        let rate_limit_ms = parse_env("REMIX_AI_RATE_LIMIT_MS", 0)?;
        let max_attempts = parse_env("REMIX_AI_MAX_ATTEMPTS", 1u32)?.max(1);
        let initial_backoff =
            Duration::from_millis(parse_env("REMIX_AI_BACKOFF_MS", DEFAULT_BACKOFF_MS)?);

        Ok(Self {
            provider,
            api_key,
            model,
            image_model,
            base_url,
            timeout,
            rate_limit_ms,
            max_attempts,
            initial_backoff,
        })
    }
}

/// Per-flow switches.
///
/// A disabled capability fails fast with [`crate::error::GenerationError::Disabled`]
/// instead of calling the backend.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// The stand-alone viability check. Submissions are scored either way.
    pub viability_check: bool,
    /// The stand-alone recipe image action.
    pub recipe_image: bool,
    /// Attach a generated image to recipes produced from ingredients.
    pub generate_recipe_image: bool,
    /// Restrict the recipe of the day to vegetarian dishes.
    pub vegetarian_daily: bool,
    /// Output shape requested from the viability check.
    pub viability_schema: ViabilitySchemaVersion,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            viability_check: true,
            recipe_image: true,
            generate_recipe_image: false,
            vegetarian_daily: false,
            viability_schema: ViabilitySchemaVersion::V2,
        }
    }
}

impl FlowConfig {
    /// Load flow switches from environment variables.
    ///
    /// - `REMIX_VIABILITY_CHECK` (default: true)
    /// - `REMIX_RECIPE_IMAGE` (default: true)
    /// - `REMIX_GENERATE_RECIPE_IMAGE` (default: false)
    /// - `REMIX_VEGETARIAN_DAILY` (default: false)
    /// - `REMIX_VIABILITY_SCHEMA`: "v1" or "v2" (default: v2)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let viability_schema = match env::var("REMIX_VIABILITY_SCHEMA") {
            Ok(v) => ViabilitySchemaVersion::parse(&v).ok_or(ConfigError::InvalidValue {
                name: "REMIX_VIABILITY_SCHEMA".to_string(),
                value: v,
            })?,
            Err(_) => defaults.viability_schema,
        };

        Ok(Self {
            viability_check: env_flag("REMIX_VIABILITY_CHECK", defaults.viability_check)?,
            recipe_image: env_flag("REMIX_RECIPE_IMAGE", defaults.recipe_image)?,
            generate_recipe_image: env_flag(
                "REMIX_GENERATE_RECIPE_IMAGE",
                defaults.generate_recipe_image,
            )?,
            vegetarian_daily: env_flag("REMIX_VEGETARIAN_DAILY", defaults.vegetarian_daily)?,
            viability_schema,
        })
    }
}

fn env_flag(name: &str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(v) => parse_flag(name, &v),
        Err(_) => Ok(default),
    }
}

/// Accepts true/false, 1/0, yes/no and on/off in any case.
fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(v) => v.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value: v,
        }),
        Err(_) => Ok(default),
    }
}
