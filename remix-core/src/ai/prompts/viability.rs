//! Prompts for judging whether a recipe is viable.

use super::json_instructions;
use crate::schema::{OutputSchema, ViabilitySchemaV1, ViabilitySchemaV2};
use crate::types::{ViabilitySchemaVersion, VIABILITY_THRESHOLD};

/// Prompt name for logs.
pub const VIABILITY_PROMPT_NAME: &str = "check_viability";

/// Render the viability prompt for the requested output shape.
pub fn render_viability_prompt(
    version: ViabilitySchemaVersion,
    name: &str,
    ingredients: &str,
    instructions: &str,
) -> String {
    let task = match version {
        ViabilitySchemaVersion::V2 => format!(
            "Rate the recipe with an integer score from 0 to 10, where 0 is not a workable recipe at all and 10 is excellent.\n\
             The recipe is viable if and only if the score is {VIABILITY_THRESHOLD} or higher; set isViable accordingly.\n\
             Always provide feedback explaining the score, including suggestions for improvement, whatever the verdict.\n\n{}",
            json_instructions(ViabilitySchemaV2::describe())
        ),
        ViabilitySchemaVersion::V1 => format!(
            "Make a determination as to whether the recipe is viable or not, and set isViable appropriately.\n\
             Explain your reasoning. If the recipe is not viable, provide suggestions for improvement.\n\n{}",
            json_instructions(ViabilitySchemaV1::describe())
        ),
    };

    format!(
        r#"You are an expert culinary advisor that rates recipe viability based on the recipe name, ingredients, and instructions.
A viable recipe is logically coherent: the instructions use the listed ingredients, the steps are in a workable order, and the result is worth publishing.

Recipe Name: {name}
Ingredients: {ingredients}
Instructions: {instructions}

{task}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_v2_prompt() {
        let prompt = render_viability_prompt(
            ViabilitySchemaVersion::V2,
            "Toast",
            "bread, butter",
            "Toast the bread and butter it.",
        );
        assert!(prompt.contains("Recipe Name: Toast"));
        assert!(prompt.contains("score is 7 or higher"));
        assert!(prompt.contains("\"feedback\""));
        assert!(!prompt.contains("\"reasoning\""));
    }

    #[test]
    fn test_render_v1_prompt() {
        let prompt = render_viability_prompt(
            ViabilitySchemaVersion::V1,
            "Toast",
            "bread, butter",
            "Toast the bread and butter it.",
        );
        assert!(prompt.contains("\"reasoning\""));
        assert!(prompt.contains("\"suggestions\""));
        assert!(!prompt.contains("\"score\""));
    }
}
