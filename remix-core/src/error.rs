use thiserror::Error;
use uuid::Uuid;

use crate::ai::AiError;
use crate::schema::ValidationError;

/// A capability that can be switched off in [`crate::ai::FlowConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ViabilityCheck,
    RecipeImage,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViabilityCheck => "viability_check",
            Capability::RecipeImage => "recipe_image",
        }
    }
}

/// Failure of a prompt flow. No partial output accompanies it.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Backend error: {0}")]
    Backend(#[from] AiError),

    #[error("Invalid backend output: {0}")]
    Validation(#[from] ValidationError),

    #[error("Capability disabled: {}", .0.as_str())]
    Disabled(Capability),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store data is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("A recipe named {0:?} is already saved")]
    Duplicate(String),
}

/// Failure of the submission gate.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The viability check itself failed; nothing was decided or stored.
    #[error("Viability check failed: {0}")]
    Viability(#[from] GenerationError),

    /// The recipe was judged viable but could not be stored.
    #[error("Recipe was viable but could not be saved: {0}")]
    Persistence(#[from] StoreError),
}

/// Caller input rejected before any backend call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("Please add at least one ingredient.")]
    NoIngredients,

    #[error("{field} must be at least {min} characters long.")]
    TooShort { field: &'static str, min: usize },

    #[error("{0} must not be empty.")]
    Empty(&'static str),
}
