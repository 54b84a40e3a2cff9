//! Prompt for producing a variation of an existing recipe.

use super::json_instructions;
use crate::schema::{OutputSchema, RecipeSchema};
use crate::types::Recipe;

/// Prompt name for logs.
pub const RECIPE_VARIATION_PROMPT_NAME: &str = "recipe_variation";

/// Render the variation prompt.
///
/// The whole source recipe is serialized so the model can return a complete
/// replacement rather than a diff.
pub fn render_recipe_variation_prompt(recipe: &Recipe, variation: &str) -> String {
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|i| format!("- {i}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a chef specializing in adapting and modifying recipes.

You have been given the following recipe:
Recipe Name: {name}
Cuisine: {cuisine}
Difficulty: {difficulty}
Cooking Time: {cooking_time}
Ingredients:
{ingredients}
Instructions:
{instructions}

Your task is to modify this recipe based on the following request: "{variation}"

Generate a new version of the recipe that incorporates the requested change.
You must provide a complete, new recipe, including a new name (if appropriate), a full list of ingredients, and complete instructions.
Do not just describe the changes. Output the entire new recipe.
Also provide the new difficulty, cooking time, cuisine, and estimated nutritional information.

{json}"#,
        name = recipe.name,
        cuisine = recipe.cuisine,
        difficulty = recipe.difficulty,
        cooking_time = recipe.cooking_time,
        instructions = recipe.instructions,
        variation = variation.trim(),
        json = json_instructions(RecipeSchema::describe()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;

    #[test]
    fn test_render_prompt_serializes_whole_recipe() {
        let recipe = Recipe {
            name: "Chicken Stir Fry".to_string(),
            ingredients: vec!["chicken".to_string(), "soy sauce".to_string()],
            instructions: "Cook the chicken, add the sauce.".to_string(),
            difficulty: Difficulty::Medium,
            cooking_time: "25 minutes".to_string(),
            cuisine: "Chinese".to_string(),
            nutritional_info: None,
            image_url: None,
        };

        let prompt = render_recipe_variation_prompt(&recipe, "make it vegan");
        assert!(prompt.contains("Recipe Name: Chicken Stir Fry"));
        assert!(prompt.contains("Cuisine: Chinese"));
        assert!(prompt.contains("Difficulty: Medium"));
        assert!(prompt.contains("Cooking Time: 25 minutes"));
        assert!(prompt.contains("- chicken\n- soy sauce"));
        assert!(prompt.contains("Cook the chicken, add the sauce."));
        assert!(prompt.contains("\"make it vegan\""));
        assert!(prompt.contains("entire new recipe"));
    }
}
