pub mod actions;
pub mod ai;
pub mod daily;
pub mod error;
pub mod saved;
pub mod schema;
pub mod store;
pub mod submission;
pub mod types;

pub use actions::{ActionFailure, ActionResult, FailureKind, RecipeActions};
pub use daily::{
    CachedRecipe, Clock, DailyRecipeCache, ManualClock, RecipeSource, SystemClock,
    RECIPE_OF_THE_DAY_TAG, REVALIDATE_WINDOW,
};
pub use error::{Capability, GenerationError, PreconditionError, StoreError, SubmitError};
pub use saved::SavedRecipes;
pub use schema::{OutputSchema, ValidationError};
pub use store::{JsonFileStore, MemoryStore, RecordStore, StoredRecord};
pub use submission::SubmissionGate;
pub use types::{
    Difficulty, LegacyViabilityReport, NutritionalInfo, Recipe, RecipeImage, SubmitOutcome,
    SubmittedRecipe, ViabilityAssessment, ViabilityReport, ViabilitySchemaVersion,
    VIABILITY_THRESHOLD,
};
