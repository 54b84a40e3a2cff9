//! Prompt for the daily featured recipe.

use super::json_instructions;
use crate::schema::{OutputSchema, RecipeSchema};

/// Prompt name for logs.
pub const RECIPE_OF_THE_DAY_PROMPT_NAME: &str = "recipe_of_the_day";

/// Render the recipe-of-the-day prompt, optionally restricted to vegetarian dishes.
pub fn render_recipe_of_the_day_prompt(vegetarian: bool) -> String {
    let vegetarian_clause = if vegetarian {
        "\nThe recipe MUST be strictly vegetarian: it must not contain any meat or fish, including stocks, sauces or garnishes made from them.\n"
    } else {
        ""
    };

    format!(
        r#"You are a chef responsible for creating a "Recipe of the Day" for a popular cooking website.

Your task is to generate a single, appealing, and relatively simple recipe that a home cook could make.
It should be interesting and sound delicious. Consider seasonality if you can.
{vegetarian_clause}
The recipe should include a name, a list of ingredients, and detailed instructions.
Also include the difficulty level (Easy, Medium, or Hard), the estimated cooking time, and the cuisine type.
Provide an estimated nutritional information breakdown per serving, including calories, protein, carbs, and fat.

{json}"#,
        json = json_instructions(RecipeSchema::describe()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let prompt = render_recipe_of_the_day_prompt(false);
        assert!(prompt.contains("Recipe of the Day"));
        assert!(prompt.contains("home cook"));
        assert!(!prompt.contains("vegetarian"));
    }

    #[test]
    fn test_render_vegetarian_prompt() {
        let prompt = render_recipe_of_the_day_prompt(true);
        assert!(prompt.contains("strictly vegetarian"));
        assert!(prompt.contains("meat or fish"));
    }
}
