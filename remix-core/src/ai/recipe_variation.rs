//! Produce a complete variation of an existing recipe.

use crate::ai::flow::{self, complete_json, Sampling};
use crate::ai::prompts::recipe_variation::{
    render_recipe_variation_prompt, RECIPE_VARIATION_PROMPT_NAME,
};
use crate::ai::AiClient;
use crate::error::GenerationError;
use crate::schema::RecipeSchema;
use crate::types::Recipe;

const SAMPLING: Sampling = Sampling {
    max_tokens: 4096,
    temperature: 0.7,
};

/// Apply a free-text variation (e.g. "make it vegan") to a recipe.
///
/// Returns a full replacement recipe, not a diff. The source image is not carried over.
pub async fn generate_recipe_variation(
    ai_client: &dyn AiClient,
    recipe: &Recipe,
    variation: &str,
) -> Result<Recipe, GenerationError> {
    let prompt = flow::render(RECIPE_VARIATION_PROMPT_NAME, || {
        render_recipe_variation_prompt(recipe, variation)
    });

    complete_json::<RecipeSchema>(ai_client, RECIPE_VARIATION_PROMPT_NAME, prompt, SAMPLING).await
}
