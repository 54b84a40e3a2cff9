//! Generate a recipe from a list of ingredients.

use crate::ai::flow::{self, complete_json, Sampling};
use crate::ai::prompts::generate_recipe::{
    render_generate_recipe_prompt, GENERATE_RECIPE_PROMPT_NAME,
};
use crate::ai::recipe_image::render_dish_photo;
use crate::ai::{AiClient, FlowConfig};
use crate::error::GenerationError;
use crate::schema::RecipeSchema;
use crate::types::Recipe;

const SAMPLING: Sampling = Sampling {
    max_tokens: 4096,
    temperature: 0.8,
};

/// Create a recipe from the given ingredients.
///
/// When `config.generate_recipe_image` is set, a photo is generated from the
/// validated recipe's name afterwards; if that fails the whole call fails.
/// Otherwise `image_url` is an empty string.
pub async fn generate_recipe(
    ai_client: &dyn AiClient,
    config: &FlowConfig,
    ingredients: &[String],
    customization: Option<&str>,
) -> Result<Recipe, GenerationError> {
    let prompt = flow::render(GENERATE_RECIPE_PROMPT_NAME, || {
        render_generate_recipe_prompt(ingredients, customization)
    });

    let mut recipe =
        complete_json::<RecipeSchema>(ai_client, GENERATE_RECIPE_PROMPT_NAME, prompt, SAMPLING)
            .await?;

    recipe.image_url = if config.generate_recipe_image {
        Some(render_dish_photo(ai_client, &recipe.name).await?)
    } else {
        Some(String::new())
    };

    Ok(recipe)
}
