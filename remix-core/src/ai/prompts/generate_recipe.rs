//! Prompt for creating a recipe from a list of ingredients.

use super::json_instructions;
use crate::schema::{OutputSchema, RecipeSchema};

/// Prompt name for logs.
pub const GENERATE_RECIPE_PROMPT_NAME: &str = "generate_recipe";

/// Render the generate-recipe prompt.
///
/// Ingredients are embedded verbatim. A non-blank `customization` becomes a
/// hard constraint on the result.
pub fn render_generate_recipe_prompt(ingredients: &[String], customization: Option<&str>) -> String {
    let ingredients_list = ingredients.join(", ");

    let customization_clause = match customization.map(str::trim) {
        Some(c) if !c.is_empty() => format!(
            "\nThe recipe must adhere to this request from the cook: \"{c}\". Treat it as a hard requirement.\n"
        ),
        _ => String::new(),
    };

    format!(
        r#"You are a chef specializing in creating unique recipes.

Create a recipe based on the following ingredients: {ingredients_list}.
{customization_clause}
The recipe should include a name, a list of ingredients, and detailed step-by-step instructions.
Also include the difficulty level (Easy, Medium, or Hard), the estimated cooking time, and the cuisine type.
Provide an estimated nutritional information breakdown per serving, including calories, protein, carbs, and fat.
Make sure the recipe is easy to follow.

{json}"#,
        json = json_instructions(RecipeSchema::describe()),
    )
}
