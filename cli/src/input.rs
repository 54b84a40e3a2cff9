use anyhow::{Context, Result};
use remix_core::Recipe;
use std::io::Read;
use std::path::Path;

/// Read a recipe as JSON from a file, or from stdin when `path` is "-".
pub fn read_recipe(path: &Path) -> Result<Recipe> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read recipe from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    parse_recipe(&text).with_context(|| format!("Invalid recipe JSON in {}", path.display()))
}

/// Accept either a bare recipe or a success envelope as printed by this tool.
pub fn parse_recipe(text: &str) -> Result<Recipe> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let recipe = match value.get("data") {
        Some(data) if value.get("success").is_some() => data.clone(),
        _ => value,
    };
    Ok(serde_json::from_value(recipe)?)
}
