//! Generate a photo of a finished dish.

use crate::ai::flow::{self, generate_image};
use crate::ai::prompts::recipe_image::{render_recipe_image_prompt, RECIPE_IMAGE_PROMPT_NAME};
use crate::ai::{AiClient, FlowConfig};
use crate::error::{Capability, GenerationError};
use crate::types::RecipeImage;

/// Generate an image for a recipe name as a stand-alone action.
pub async fn generate_recipe_image(
    ai_client: &dyn AiClient,
    config: &FlowConfig,
    recipe_name: &str,
) -> Result<RecipeImage, GenerationError> {
    if !config.recipe_image {
        return Err(GenerationError::Disabled(Capability::RecipeImage));
    }

    let image_url = render_dish_photo(ai_client, recipe_name).await?;
    Ok(RecipeImage { image_url })
}

/// Image sub-call used by flows that attach a photo to a recipe.
pub(crate) async fn render_dish_photo(
    ai_client: &dyn AiClient,
    recipe_name: &str,
) -> Result<String, GenerationError> {
    let prompt = flow::render(RECIPE_IMAGE_PROMPT_NAME, || {
        render_recipe_image_prompt(recipe_name)
    });
    generate_image(ai_client, RECIPE_IMAGE_PROMPT_NAME, prompt).await
}
