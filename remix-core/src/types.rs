use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty level of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: &'static [Difficulty] = &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parse a difficulty label, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated nutritional information per serving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NutritionalInfo {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

/// A generated recipe.
///
/// Instances returned by the generation flows have always passed
/// [`crate::schema::RecipeSchema`] validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub difficulty: Difficulty,
    pub cooking_time: String,
    pub cuisine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutritional_info: Option<NutritionalInfo>,
    /// Data URI or remote URL of an illustrative image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Viability judgment, schema version 2 (canonical).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ViabilityReport {
    pub is_viable: bool,
    /// Integer score in `0..=10`.
    pub score: u8,
    pub feedback: String,
}

/// Viability judgment, schema version 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LegacyViabilityReport {
    pub is_viable: bool,
    pub reasoning: String,
    pub suggestions: String,
}

/// Minimum score for a recipe to count as viable.
pub const VIABILITY_THRESHOLD: u8 = 7;

/// Which viability output shape the backend is asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ViabilitySchemaVersion {
    V1,
    #[default]
    V2,
}

impl ViabilitySchemaVersion {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Some(Self::V1),
            "v2" | "2" => Some(Self::V2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

/// Result of a viability check, tagged with the schema version that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "schemaVersion", rename_all = "lowercase")]
pub enum ViabilityAssessment {
    V1(LegacyViabilityReport),
    V2(ViabilityReport),
}

impl ViabilityAssessment {
    pub fn is_viable(&self) -> bool {
        match self {
            ViabilityAssessment::V1(report) => report.is_viable,
            ViabilityAssessment::V2(report) => report.is_viable,
        }
    }

    pub fn version(&self) -> ViabilitySchemaVersion {
        match self {
            ViabilityAssessment::V1(_) => ViabilitySchemaVersion::V1,
            ViabilityAssessment::V2(_) => ViabilitySchemaVersion::V2,
        }
    }
}

/// A user-submitted recipe. Ingredients and instructions are free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SubmittedRecipe {
    #[serde(alias = "recipeName")]
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
}

/// Outcome of passing a submission through the viability gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub was_viable: bool,
}

/// Output of the stand-alone image flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RecipeImage {
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse(" MEDIUM "), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("Hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("Moderate"), None);
        assert_eq!(Difficulty::parse(""), None);
    }

    #[test]
    fn test_recipe_serializes_camel_case() {
        let recipe = Recipe {
            name: "Pancakes".to_string(),
            ingredients: vec!["egg".to_string()],
            instructions: "Whisk and fry.".to_string(),
            difficulty: Difficulty::Easy,
            cooking_time: "20 minutes".to_string(),
            cuisine: "American".to_string(),
            nutritional_info: None,
            image_url: Some(String::new()),
        };

        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["cookingTime"], "20 minutes");
        assert_eq!(json["difficulty"], "Easy");
        assert_eq!(json["imageUrl"], "");
        assert!(json.get("nutritionalInfo").is_none());
    }

    #[test]
    fn test_assessment_tagged_by_version() {
        let assessment = ViabilityAssessment::V2(ViabilityReport {
            is_viable: true,
            score: 8,
            feedback: "Solid.".to_string(),
        });

        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["schemaVersion"], "v2");
        assert_eq!(json["score"], 8);
        assert!(assessment.is_viable());
    }

    #[test]
    fn test_submitted_recipe_accepts_recipe_name_alias() {
        let submitted: SubmittedRecipe = serde_json::from_str(
            r#"{"recipeName": "Soup", "ingredients": "water, salt", "instructions": "Boil."}"#,
        )
        .unwrap();
        assert_eq!(submitted.name, "Soup");
    }
}
