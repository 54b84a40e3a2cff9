//! Output schemas for the generative backend.
//!
//! Every flow validates the raw model output against one of these schemas
//! before handing anything to a caller. Validation works on the parsed JSON
//! value so that errors can name the offending field; nothing missing is ever
//! filled in with a default.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{
    Difficulty, LegacyViabilityReport, NutritionalInfo, Recipe, ViabilityReport,
    VIABILITY_THRESHOLD,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Output must be a JSON object")]
    NotAnObject,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field {field} must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("Field {0} must not be empty")]
    Empty(String),

    #[error("Field {field} has invalid value {value:?} (expected one of: {allowed})")]
    InvalidEnum {
        field: String,
        value: String,
        allowed: String,
    },

    #[error("Field {field} is out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        field: String,
        value: String,
        min: i64,
        max: i64,
    },
}

/// A structured output contract with the generative backend.
pub trait OutputSchema {
    type Output;

    /// Schema name, used in logs.
    const NAME: &'static str;

    /// JSON shape embedded in prompts so the model knows what to return.
    fn describe() -> &'static str;

    /// Validate an already-parsed JSON value.
    fn validate_value(value: &Value) -> Result<Self::Output, ValidationError>;

    /// Parse and validate raw model output.
    fn validate(raw: &str) -> Result<Self::Output, ValidationError> {
        let value = parse_json(raw)?;
        Self::validate_value(&value)
    }
}

/// Validate raw backend output against schema `S`.
pub fn validate<S: OutputSchema>(raw: &str) -> Result<S::Output, ValidationError> {
    S::validate(raw)
}

/// Full recipe, as returned by the generation, variation and recipe-of-the-day flows.
///
/// `imageUrl` is not part of the backend contract; flows attach it afterwards.
pub struct RecipeSchema;

impl OutputSchema for RecipeSchema {
    type Output = Recipe;
    const NAME: &'static str = "recipe";

    fn describe() -> &'static str {
        r#"{
  "name": "string, the name of the recipe",
  "ingredients": ["string, one entry per ingredient line including quantity"],
  "instructions": "string, step-by-step instructions",
  "difficulty": "one of \"Easy\", \"Medium\", \"Hard\"",
  "cookingTime": "string, e.g. \"30 minutes\"",
  "cuisine": "string, e.g. \"Italian\"",
  "nutritionalInfo": {
    "calories": "string, estimated calories per serving",
    "protein": "string, estimated protein in grams per serving",
    "carbs": "string, estimated carbohydrates in grams per serving",
    "fat": "string, estimated fat in grams per serving"
  }
}"#
    }

    fn validate_value(value: &Value) -> Result<Recipe, ValidationError> {
        let fields = Fields::root(value)?;

        let name = fields.string("name")?;
        let ingredients = fields.string_list("ingredients")?;
        let instructions = fields.string("instructions")?;

        let difficulty_raw = fields.string("difficulty")?;
        let difficulty =
            Difficulty::parse(&difficulty_raw).ok_or_else(|| ValidationError::InvalidEnum {
                field: fields.path("difficulty"),
                value: difficulty_raw,
                allowed: Difficulty::ALL
                    .iter()
                    .map(Difficulty::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        let cooking_time = fields.string("cookingTime")?;
        let cuisine = fields.string("cuisine")?;

        let nutritional_info = match fields.optional("nutritionalInfo") {
            Some(info) => {
                let info = fields.nested("nutritionalInfo", info)?;
                Some(NutritionalInfo {
                    calories: info.string("calories")?,
                    protein: info.string("protein")?,
                    carbs: info.string("carbs")?,
                    fat: info.string("fat")?,
                })
            }
            None => None,
        };

        Ok(Recipe {
            name,
            ingredients,
            instructions,
            difficulty,
            cooking_time,
            cuisine,
            nutritional_info,
            image_url: None,
        })
    }
}

/// Canonical viability judgment with a numeric score.
pub struct ViabilitySchemaV2;

impl OutputSchema for ViabilitySchemaV2 {
    type Output = ViabilityReport;
    const NAME: &'static str = "viability_v2";

    fn describe() -> &'static str {
        r#"{
  "score": "integer from 0 to 10",
  "isViable": "boolean, true if and only if score is 7 or higher",
  "feedback": "string, explanation of the score and suggestions for improvement"
}"#
    }

    fn validate_value(value: &Value) -> Result<ViabilityReport, ValidationError> {
        let fields = Fields::root(value)?;

        let score = fields.integer_in_range("score", 0, 10)?;
        let reported_viable = fields.boolean("isViable")?;
        let feedback = fields.string("feedback")?;

        // Range checked above.
        let score = score as u8;
        let is_viable = score >= VIABILITY_THRESHOLD;
        if is_viable != reported_viable {
            tracing::warn!(
                score,
                reported_viable,
                "Backend viability flag disagrees with score, using score"
            );
        }

        Ok(ViabilityReport {
            is_viable,
            score,
            feedback,
        })
    }
}

/// Earlier viability judgment with reasoning and suggestions instead of a score.
pub struct ViabilitySchemaV1;

impl OutputSchema for ViabilitySchemaV1 {
    type Output = LegacyViabilityReport;
    const NAME: &'static str = "viability_v1";

    fn describe() -> &'static str {
        r#"{
  "isViable": "boolean, whether the recipe is viable",
  "reasoning": "string, the reasoning behind the assessment",
  "suggestions": "string, suggestions for improving the recipe, if any"
}"#
    }

    fn validate_value(value: &Value) -> Result<LegacyViabilityReport, ValidationError> {
        let fields = Fields::root(value)?;

        Ok(LegacyViabilityReport {
            is_viable: fields.boolean("isViable")?,
            reasoning: fields.string("reasoning")?,
            // Viable recipes may legitimately come back without suggestions.
            suggestions: fields.text("suggestions")?,
        })
    }
}

/// Parse model output as JSON, unwrapping a Markdown code fence if present.
pub fn parse_json(raw: &str) -> Result<Value, ValidationError> {
    let body = strip_code_fence(raw);
    let value: Value =
        serde_json::from_str(body).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    if !value.is_object() {
        return Err(ValidationError::NotAnObject);
    }
    Ok(value)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Typed accessors over a JSON object that report errors by field path.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> Fields<'a> {
    fn root(value: &'a Value) -> Result<Self, ValidationError> {
        let object = value.as_object().ok_or(ValidationError::NotAnObject)?;
        Ok(Self {
            object,
            prefix: String::new(),
        })
    }

    fn nested(&self, key: &str, value: &'a Value) -> Result<Fields<'a>, ValidationError> {
        let object = value.as_object().ok_or_else(|| ValidationError::WrongType {
            field: self.path(key),
            expected: "an object",
        })?;
        Ok(Fields {
            object,
            prefix: self.path(key),
        })
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }

    /// Present and non-null value, if any.
    fn optional(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|v| !v.is_null())
    }

    fn required(&self, key: &str) -> Result<&'a Value, ValidationError> {
        self.optional(key)
            .ok_or_else(|| ValidationError::MissingField(self.path(key)))
    }

    /// Required string, possibly empty.
    fn text(&self, key: &str) -> Result<String, ValidationError> {
        self.required(key)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ValidationError::WrongType {
                field: self.path(key),
                expected: "a string",
            })
    }

    /// Required non-blank string.
    fn string(&self, key: &str) -> Result<String, ValidationError> {
        let s = self.text(key)?;
        if s.trim().is_empty() {
            return Err(ValidationError::Empty(self.path(key)));
        }
        Ok(s)
    }

    /// Required non-empty list of non-blank strings.
    fn string_list(&self, key: &str) -> Result<Vec<String>, ValidationError> {
        let items = self
            .required(key)?
            .as_array()
            .ok_or_else(|| ValidationError::WrongType {
                field: self.path(key),
                expected: "an array of strings",
            })?;

        if items.is_empty() {
            return Err(ValidationError::Empty(self.path(key)));
        }

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let field = format!("{}[{}]", self.path(key), i);
                match item.as_str() {
                    Some(s) if s.trim().is_empty() => Err(ValidationError::Empty(field)),
                    Some(s) => Ok(s.to_string()),
                    None => Err(ValidationError::WrongType {
                        field,
                        expected: "a string",
                    }),
                }
            })
            .collect()
    }

    fn boolean(&self, key: &str) -> Result<bool, ValidationError> {
        self.required(key)?
            .as_bool()
            .ok_or_else(|| ValidationError::WrongType {
                field: self.path(key),
                expected: "a boolean",
            })
    }

    fn integer_in_range(&self, key: &str, min: i64, max: i64) -> Result<i64, ValidationError> {
        let value = self.required(key)?;
        let out_of_range = || ValidationError::OutOfRange {
            field: self.path(key),
            value: value.to_string(),
            min,
            max,
        };

        let n = match (value.as_i64(), value.as_u64()) {
            (Some(n), _) => n,
            // Integer too large for i64.
            (None, Some(_)) => return Err(out_of_range()),
            (None, None) => {
                return Err(ValidationError::WrongType {
                    field: self.path(key),
                    expected: "an integer",
                })
            }
        };

        if !(min..=max).contains(&n) {
            return Err(out_of_range());
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_recipe_json() -> Value {
        json!({
            "name": "Fluffy Pancakes",
            "ingredients": ["2 eggs", "1 cup flour", "1 cup milk"],
            "instructions": "1. Whisk.\n2. Fry.",
            "difficulty": "Easy",
            "cookingTime": "20 minutes",
            "cuisine": "American",
            "nutritionalInfo": {
                "calories": "250",
                "protein": "9g",
                "carbs": "35g",
                "fat": "7g"
            }
        })
    }

    #[test]
    fn test_valid_recipe() {
        let recipe = validate::<RecipeSchema>(&valid_recipe_json().to_string()).unwrap();
        assert_eq!(recipe.name, "Fluffy Pancakes");
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.nutritional_info.unwrap().protein, "9g");
        assert_eq!(recipe.image_url, None);
    }

    #[test]
    fn test_recipe_without_nutrition_is_valid() {
        let mut value = valid_recipe_json();
        value.as_object_mut().unwrap().remove("nutritionalInfo");
        let recipe = RecipeSchema::validate_value(&value).unwrap();
        assert!(recipe.nutritional_info.is_none());
    }

    #[test]
    fn test_recipe_in_code_fence() {
        let raw = format!("```json\n{}\n```", valid_recipe_json());
        assert!(validate::<RecipeSchema>(&raw).is_ok());
    }

    #[test]
    fn test_missing_name() {
        let mut value = valid_recipe_json();
        value.as_object_mut().unwrap().remove("name");
        assert_eq!(
            RecipeSchema::validate_value(&value),
            Err(ValidationError::MissingField("name".to_string()))
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut value = valid_recipe_json();
        value["instructions"] = Value::Null;
        assert_eq!(
            RecipeSchema::validate_value(&value),
            Err(ValidationError::MissingField("instructions".to_string()))
        );
    }

    #[test]
    fn test_empty_ingredients() {
        let mut value = valid_recipe_json();
        value["ingredients"] = json!([]);
        assert_eq!(
            RecipeSchema::validate_value(&value),
            Err(ValidationError::Empty("ingredients".to_string()))
        );
    }

    #[test]
    fn test_ingredient_wrong_type() {
        let mut value = valid_recipe_json();
        value["ingredients"] = json!(["egg", 3]);
        assert_eq!(
            RecipeSchema::validate_value(&value),
            Err(ValidationError::WrongType {
                field: "ingredients[1]".to_string(),
                expected: "a string",
            })
        );
    }

    #[test]
    fn test_invalid_difficulty() {
        let mut value = valid_recipe_json();
        value["difficulty"] = json!("Moderate");
        let err = RecipeSchema::validate_value(&value).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEnum { ref field, .. } if field == "difficulty"));
    }

    #[test]
    fn test_partial_nutrition_rejected() {
        let mut value = valid_recipe_json();
        value["nutritionalInfo"].as_object_mut().unwrap().remove("fat");
        assert_eq!(
            RecipeSchema::validate_value(&value),
            Err(ValidationError::MissingField("nutritionalInfo.fat".to_string()))
        );
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut value = valid_recipe_json();
        value["name"] = json!("   ");
        assert_eq!(
            RecipeSchema::validate_value(&value),
            Err(ValidationError::Empty("name".to_string()))
        );
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            validate::<RecipeSchema>("Here is your recipe!"),
            Err(ValidationError::InvalidJson(_))
        ));
        assert_eq!(
            validate::<RecipeSchema>("[1, 2]"),
            Err(ValidationError::NotAnObject)
        );
    }

    #[test]
    fn test_viability_flag_derived_from_score() {
        for score in 0..=10u8 {
            let raw = json!({"score": score, "isViable": true, "feedback": "ok"}).to_string();
            let report = validate::<ViabilitySchemaV2>(&raw).unwrap();
            assert_eq!(report.is_viable, score >= 7, "score {}", score);
            assert_eq!(report.score, score);
        }
    }

    #[test]
    fn test_viability_score_out_of_range() {
        for bad in [json!(11), json!(-1), json!(u64::MAX)] {
            let raw = json!({"score": bad, "isViable": true, "feedback": "ok"}).to_string();
            assert!(matches!(
                validate::<ViabilitySchemaV2>(&raw),
                Err(ValidationError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_viability_score_not_integer() {
        let raw = json!({"score": 7.5, "isViable": true, "feedback": "ok"}).to_string();
        assert_eq!(
            validate::<ViabilitySchemaV2>(&raw),
            Err(ValidationError::WrongType {
                field: "score".to_string(),
                expected: "an integer",
            })
        );
    }

    #[test]
    fn test_viability_feedback_required() {
        let raw = json!({"score": 9, "isViable": true}).to_string();
        assert_eq!(
            validate::<ViabilitySchemaV2>(&raw),
            Err(ValidationError::MissingField("feedback".to_string()))
        );
    }

    #[test]
    fn test_legacy_viability() {
        let raw = json!({"isViable": true, "reasoning": "Balanced.", "suggestions": ""}).to_string();
        let report = validate::<ViabilitySchemaV1>(&raw).unwrap();
        assert!(report.is_viable);
        assert_eq!(report.suggestions, "");
    }
}
