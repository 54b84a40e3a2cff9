//! Generate the daily featured recipe, always with a photo.

use async_trait::async_trait;
use std::sync::Arc;

use crate::ai::flow::{self, complete_json, Sampling};
use crate::ai::prompts::recipe_of_the_day::{
    render_recipe_of_the_day_prompt, RECIPE_OF_THE_DAY_PROMPT_NAME,
};
use crate::ai::recipe_image::render_dish_photo;
use crate::ai::AiClient;
use crate::daily::RecipeSource;
use crate::error::GenerationError;
use crate::schema::RecipeSchema;
use crate::types::Recipe;

const SAMPLING: Sampling = Sampling {
    max_tokens: 4096,
    temperature: 1.0,
};

/// Generate a home-cook-friendly recipe and a photo of it.
///
/// The image call starts only after the recipe validates; failure of either
/// step fails the whole flow.
pub async fn generate_recipe_of_the_day(
    ai_client: &dyn AiClient,
    vegetarian: bool,
) -> Result<Recipe, GenerationError> {
    let prompt = flow::render(RECIPE_OF_THE_DAY_PROMPT_NAME, || {
        render_recipe_of_the_day_prompt(vegetarian)
    });

    let mut recipe =
        complete_json::<RecipeSchema>(ai_client, RECIPE_OF_THE_DAY_PROMPT_NAME, prompt, SAMPLING)
            .await?;

    recipe.image_url = Some(render_dish_photo(ai_client, &recipe.name).await?);
    Ok(recipe)
}

/// [`RecipeSource`] backed by [`generate_recipe_of_the_day`].
pub struct RecipeOfTheDayFlow {
    ai_client: Arc<dyn AiClient>,
    vegetarian: bool,
}

impl RecipeOfTheDayFlow {
    pub fn new(ai_client: Arc<dyn AiClient>, vegetarian: bool) -> Self {
        Self {
            ai_client,
            vegetarian,
        }
    }
}

#[async_trait]
impl RecipeSource for RecipeOfTheDayFlow {
    async fn generate(&self) -> Result<Recipe, GenerationError> {
        generate_recipe_of_the_day(self.ai_client.as_ref(), self.vegetarian).await
    }
}
