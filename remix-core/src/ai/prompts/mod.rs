//! AI prompt templates.

pub mod generate_recipe;
pub mod recipe_image;
pub mod recipe_of_the_day;
pub mod recipe_variation;
pub mod viability;

pub use generate_recipe::render_generate_recipe_prompt;
pub use recipe_image::render_recipe_image_prompt;
pub use recipe_of_the_day::render_recipe_of_the_day_prompt;
pub use recipe_variation::render_recipe_variation_prompt;
pub use viability::render_viability_prompt;

/// Closing instruction shared by every JSON-producing prompt.
fn json_instructions(schema: &str) -> String {
    format!("Respond with JSON only, no other text, matching this structure:\n{schema}")
}
