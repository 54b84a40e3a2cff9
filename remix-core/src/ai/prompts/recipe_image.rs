//! Prompt for a photo of a finished dish.

/// Prompt name for logs.
pub const RECIPE_IMAGE_PROMPT_NAME: &str = "recipe_image";

pub fn render_recipe_image_prompt(recipe_name: &str) -> String {
    format!(
        "A delicious-looking, professionally photographed image of \"{}\", with a clean, bright background.",
        recipe_name.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let prompt = render_recipe_image_prompt(" Shakshuka ");
        assert!(prompt.contains("\"Shakshuka\""));
    }
}
