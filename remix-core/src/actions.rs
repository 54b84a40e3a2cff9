//! User-facing actions: check input, run a flow, wrap the result in an envelope.
//!
//! Every action returns an [`ActionResult`], which serializes as
//! `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`.
//! Failures carry a human-readable message; the underlying cause is logged.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::path::Path;
use std::sync::Arc;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::ai::{self, AiClient, FlowConfig, RecipeOfTheDayFlow};
use crate::daily::{CachedRecipe, Clock, DailyRecipeCache, SystemClock};
use crate::error::{GenerationError, PreconditionError, StoreError, SubmitError};
use crate::saved::SavedRecipes;
use crate::store::{
    JsonFileStore, MemoryStore, RecordStore, StoredRecord, SAVED_RECIPES_FILE, SUBMISSIONS_FILE,
};
use crate::submission::SubmissionGate;
use crate::types::{Recipe, RecipeImage, SubmitOutcome, SubmittedRecipe, ViabilityAssessment};

pub const GENERATE_RECIPE_FAILED: &str = "Failed to generate recipe. Please try again.";
pub const GENERATE_VARIATION_FAILED: &str = "Failed to generate variation. Please try again.";
pub const CHECK_VIABILITY_FAILED: &str = "Failed to check recipe viability. Please try again.";
pub const GENERATE_IMAGE_FAILED: &str = "Failed to generate image. Please try again.";
pub const RECIPE_OF_THE_DAY_FAILED: &str =
    "Failed to load the recipe of the day. Please try again.";
pub const FEATURE_DISABLED: &str = "This feature is coming soon!";
pub const SUBMISSION_NOT_SAVED: &str =
    "Your recipe was judged viable but could not be saved. Please try again.";
pub const LOAD_SUBMISSIONS_FAILED: &str = "Could not load submissions. Please try again.";
pub const ALREADY_SAVED: &str = "This recipe is already in your saved list.";
pub const SAVE_RECIPE_FAILED: &str = "Could not save recipe. Please try again.";
pub const LOAD_SAVED_FAILED: &str = "Could not load saved recipes. Please try again.";
pub const REMOVE_SAVED_FAILED: &str = "Could not remove recipe. Please try again.";
pub const CLEAR_SAVED_FAILED: &str = "Could not clear saved recipes. Please try again.";
pub const RECIPE_NOT_FOUND: &str = "Recipe not found.";

const MIN_NAME_LEN: usize = 3;
const MIN_INGREDIENTS_LEN: usize = 10;
const MIN_INSTRUCTIONS_LEN: usize = 20;

/// Why an action failed, for callers that need more than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Caller input was rejected before any backend call.
    Precondition,
    NotFound,
    Duplicate,
    /// A store read or write failed.
    Persistence,
    /// The backend failed, returned invalid output, or the capability is off.
    Unavailable,
}

/// A failed action: a kind and a message safe to show to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ActionFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<PreconditionError> for ActionFailure {
    fn from(e: PreconditionError) -> Self {
        ActionFailure::new(FailureKind::Precondition, e.to_string())
    }
}

/// Outcome of an action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    Success(T),
    Failure(ActionFailure),
}

impl<T> ActionResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ActionResult::Success(data) => Some(data),
            ActionResult::Failure(_) => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ActionResult::Success(data) => Some(data),
            ActionResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ActionFailure> {
        match self {
            ActionResult::Success(_) => None,
            ActionResult::Failure(failure) => Some(failure),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.failure().map(|f| f.message.as_str())
    }

    /// Transform the success value, keeping failures as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self {
            ActionResult::Success(data) => ActionResult::Success(f(data)),
            ActionResult::Failure(failure) => ActionResult::Failure(failure),
        }
    }

    fn fail(kind: FailureKind, message: impl Into<String>) -> Self {
        ActionResult::Failure(ActionFailure::new(kind, message))
    }
}

impl<T> From<Result<T, ActionFailure>> for ActionResult<T> {
    fn from(result: Result<T, ActionFailure>) -> Self {
        match result {
            Ok(data) => ActionResult::Success(data),
            Err(failure) => ActionResult::Failure(failure),
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut envelope = serializer.serialize_struct("ActionResult", 2)?;
        match self {
            ActionResult::Success(data) => {
                envelope.serialize_field("success", &true)?;
                envelope.serialize_field("data", data)?;
            }
            ActionResult::Failure(failure) => {
                envelope.serialize_field("success", &false)?;
                envelope.serialize_field("error", &failure.message)?;
            }
        }
        envelope.end()
    }
}

/// Split comma-separated ingredients, dropping blanks.
pub fn parse_ingredients(input: &str) -> Result<Vec<String>, PreconditionError> {
    let ingredients: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .collect();

    if ingredients.is_empty() {
        return Err(PreconditionError::NoIngredients);
    }
    Ok(ingredients)
}

fn require_len(value: &str, field: &'static str, min: usize) -> Result<(), PreconditionError> {
    if value.trim().chars().count() < min {
        return Err(PreconditionError::TooShort { field, min });
    }
    Ok(())
}

fn require_non_empty(value: &str, field: &'static str) -> Result<(), PreconditionError> {
    if value.trim().is_empty() {
        return Err(PreconditionError::Empty(field));
    }
    Ok(())
}

/// Length checks shared by viability checks and submissions.
pub fn check_recipe_text(
    name: &str,
    ingredients: &str,
    instructions: &str,
) -> Result<(), PreconditionError> {
    require_len(name, "Recipe name", MIN_NAME_LEN)?;
    require_len(ingredients, "Ingredients list", MIN_INGREDIENTS_LEN)?;
    require_len(instructions, "Instructions", MIN_INSTRUCTIONS_LEN)?;
    Ok(())
}

fn generation_failure(action: &str, e: &GenerationError, message: &'static str) -> ActionFailure {
    match e {
        GenerationError::Disabled(capability) => {
            tracing::info!(action = action, capability = capability.as_str(), "Capability disabled");
            ActionFailure::new(FailureKind::Unavailable, FEATURE_DISABLED)
        }
        _ => {
            tracing::error!(action = action, error = %e, "Action failed");
            ActionFailure::new(FailureKind::Unavailable, message)
        }
    }
}

fn store_failure(action: &str, e: &StoreError, message: &'static str) -> ActionFailure {
    match e {
        StoreError::NotFound(id) => {
            tracing::info!(action = action, id = %id, "Record not found");
            ActionFailure::new(FailureKind::NotFound, RECIPE_NOT_FOUND)
        }
        StoreError::Duplicate(name) => {
            tracing::info!(action = action, recipe = %name, "Duplicate record");
            ActionFailure::new(FailureKind::Duplicate, ALREADY_SAVED)
        }
        _ => {
            tracing::error!(action = action, error = %e, "Store operation failed");
            ActionFailure::new(FailureKind::Persistence, message)
        }
    }
}

/// The application's actions over one AI client, one daily cache and two stores.
pub struct RecipeActions {
    ai_client: Arc<dyn AiClient>,
    config: FlowConfig,
    daily: DailyRecipeCache,
    submissions: SubmissionGate,
    saved: SavedRecipes,
}

impl RecipeActions {
    pub fn new(
        ai_client: Arc<dyn AiClient>,
        config: FlowConfig,
        daily: DailyRecipeCache,
        submissions: Arc<dyn RecordStore<SubmittedRecipe>>,
        saved: Arc<dyn RecordStore<Recipe>>,
    ) -> Self {
        let submissions = SubmissionGate::new(ai_client.clone(), config.clone(), submissions);
        Self {
            ai_client,
            config,
            daily,
            submissions,
            saved: SavedRecipes::new(saved),
        }
    }

    /// Actions persisting to JSON files in `data_dir`, with a wall-clock daily cache.
    pub fn with_json_stores(
        ai_client: Arc<dyn AiClient>,
        config: FlowConfig,
        data_dir: &Path,
    ) -> Self {
        tracing::info!(data_dir = %data_dir.display(), "Using JSON file stores");
        let submissions = Arc::new(JsonFileStore::in_dir(data_dir, SUBMISSIONS_FILE));
        let saved = Arc::new(JsonFileStore::in_dir(data_dir, SAVED_RECIPES_FILE));
        let daily = Self::daily_cache(ai_client.clone(), &config, Arc::new(SystemClock));
        Self::new(ai_client, config, daily, submissions, saved)
    }

    /// Actions with in-memory stores and the given clock.
    pub fn in_memory(
        ai_client: Arc<dyn AiClient>,
        config: FlowConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let daily = Self::daily_cache(ai_client.clone(), &config, clock);
        Self::new(
            ai_client,
            config,
            daily,
            Arc::new(MemoryStore::<SubmittedRecipe>::new()),
            Arc::new(MemoryStore::<Recipe>::new()),
        )
    }

    fn daily_cache(
        ai_client: Arc<dyn AiClient>,
        config: &FlowConfig,
        clock: Arc<dyn Clock>,
    ) -> DailyRecipeCache {
        let flow = RecipeOfTheDayFlow::new(ai_client, config.vegetarian_daily);
        DailyRecipeCache::new(Arc::new(flow), clock)
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn daily(&self) -> &DailyRecipeCache {
        &self.daily
    }

    /// Generate a recipe from comma-separated ingredients.
    pub async fn generate_recipe(
        &self,
        ingredients: &str,
        customization: Option<&str>,
    ) -> ActionResult<Recipe> {
        let ingredients = match parse_ingredients(ingredients) {
            Ok(i) => i,
            Err(e) => return ActionResult::Failure(e.into()),
        };
        let customization = customization.map(str::trim).filter(|c| !c.is_empty());

        ai::generate_recipe(
            self.ai_client.as_ref(),
            &self.config,
            &ingredients,
            customization,
        )
        .instrument(info_span!("action", name = "generate_recipe"))
        .await
        .map_err(|e| generation_failure("generate_recipe", &e, GENERATE_RECIPE_FAILED))
        .into()
    }

    pub async fn generate_variation(&self, recipe: &Recipe, variation: &str) -> ActionResult<Recipe> {
        if let Err(e) = require_non_empty(variation, "Variation") {
            return ActionResult::Failure(e.into());
        }

        ai::generate_recipe_variation(self.ai_client.as_ref(), recipe, variation.trim())
            .instrument(info_span!("action", name = "generate_variation"))
            .await
            .map_err(|e| generation_failure("generate_variation", &e, GENERATE_VARIATION_FAILED))
            .into()
    }

    pub async fn check_viability(
        &self,
        name: &str,
        ingredients: &str,
        instructions: &str,
    ) -> ActionResult<ViabilityAssessment> {
        if let Err(e) = check_recipe_text(name, ingredients, instructions) {
            return ActionResult::Failure(e.into());
        }

        ai::check_recipe_viability(
            self.ai_client.as_ref(),
            &self.config,
            name,
            ingredients,
            instructions,
        )
        .instrument(info_span!("action", name = "check_viability"))
        .await
        .map_err(|e| generation_failure("check_viability", &e, CHECK_VIABILITY_FAILED))
        .into()
    }

    pub async fn generate_image(&self, recipe_name: &str) -> ActionResult<RecipeImage> {
        if let Err(e) = require_non_empty(recipe_name, "Recipe name") {
            return ActionResult::Failure(e.into());
        }

        ai::generate_recipe_image(self.ai_client.as_ref(), &self.config, recipe_name.trim())
            .instrument(info_span!("action", name = "generate_image"))
            .await
            .map_err(|e| generation_failure("generate_image", &e, GENERATE_IMAGE_FAILED))
            .into()
    }

    /// The cached recipe of the day, regenerated when stale.
    pub async fn recipe_of_the_day(&self) -> ActionResult<Recipe> {
        self.recipe_of_the_day_entry().await.map(|entry| entry.recipe)
    }

    /// The recipe of the day together with the time it was generated.
    pub async fn recipe_of_the_day_entry(&self) -> ActionResult<CachedRecipe> {
        self.daily
            .get_entry()
            .instrument(info_span!("action", name = "recipe_of_the_day"))
            .await
            .map_err(|e| generation_failure("recipe_of_the_day", &e, RECIPE_OF_THE_DAY_FAILED))
            .into()
    }

    /// Invalidate the recipe of the day and regenerate it immediately.
    pub async fn reset_recipe_of_the_day(&self) -> ActionResult<Recipe> {
        self.daily.invalidate();
        self.daily
            .get()
            .instrument(info_span!("action", name = "reset_recipe_of_the_day"))
            .await
            .map_err(|e| {
                generation_failure("reset_recipe_of_the_day", &e, RECIPE_OF_THE_DAY_FAILED)
            })
            .into()
    }

    pub async fn submit_recipe(&self, submission: SubmittedRecipe) -> ActionResult<SubmitOutcome> {
        if let Err(e) = check_recipe_text(
            &submission.name,
            &submission.ingredients,
            &submission.instructions,
        ) {
            return ActionResult::Failure(e.into());
        }

        match self
            .submissions
            .submit(submission)
            .instrument(info_span!("action", name = "submit_recipe"))
            .await
        {
            Ok(outcome) => ActionResult::Success(outcome),
            Err(SubmitError::Viability(e)) => {
                ActionResult::Failure(generation_failure("submit_recipe", &e, CHECK_VIABILITY_FAILED))
            }
            Err(SubmitError::Persistence(e)) => {
                tracing::error!(action = "submit_recipe", error = %e, "Viable submission not saved");
                ActionResult::fail(FailureKind::Persistence, SUBMISSION_NOT_SAVED)
            }
        }
    }

    pub async fn list_submissions(&self) -> ActionResult<Vec<StoredRecord<SubmittedRecipe>>> {
        match self.submissions.list().await {
            Ok(all) => ActionResult::Success(all),
            Err(e) => {
                tracing::error!(action = "list_submissions", error = %e, "Could not list submissions");
                ActionResult::fail(FailureKind::Persistence, LOAD_SUBMISSIONS_FAILED)
            }
        }
    }

    pub async fn save_recipe(&self, recipe: Recipe) -> ActionResult<StoredRecord<Recipe>> {
        if let Err(e) = require_non_empty(&recipe.name, "Recipe name") {
            return ActionResult::Failure(e.into());
        }

        self.saved
            .save(recipe)
            .await
            .map_err(|e| store_failure("save_recipe", &e, SAVE_RECIPE_FAILED))
            .into()
    }

    pub async fn list_saved(&self) -> ActionResult<Vec<StoredRecord<Recipe>>> {
        self.saved
            .list()
            .await
            .map_err(|e| store_failure("list_saved", &e, LOAD_SAVED_FAILED))
            .into()
    }

    pub async fn remove_saved(&self, id: Uuid) -> ActionResult<StoredRecord<Recipe>> {
        self.saved
            .remove(id)
            .await
            .map_err(|e| store_failure("remove_saved", &e, REMOVE_SAVED_FAILED))
            .into()
    }

    /// Remove all saved recipes; the data is the number removed.
    pub async fn clear_saved(&self) -> ActionResult<usize> {
        self.saved
            .clear()
            .await
            .map_err(|e| store_failure("clear_saved", &e, CLEAR_SAVED_FAILED))
            .into()
    }
}
