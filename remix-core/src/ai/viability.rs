//! Judge whether a recipe is coherent enough to publish.

use crate::ai::flow::{self, complete_json, Sampling};
use crate::ai::prompts::viability::{render_viability_prompt, VIABILITY_PROMPT_NAME};
use crate::ai::{AiClient, FlowConfig};
use crate::error::{Capability, GenerationError};
use crate::schema::{ViabilitySchemaV1, ViabilitySchemaV2};
use crate::types::{ViabilityAssessment, ViabilitySchemaVersion};

const SAMPLING: Sampling = Sampling {
    max_tokens: 1024,
    temperature: 0.2,
};

/// The stand-alone viability check, honoring the `viability_check` switch.
///
/// For the canonical (v2) shape, `is_viable` is derived from the score.
pub async fn check_recipe_viability(
    ai_client: &dyn AiClient,
    config: &FlowConfig,
    name: &str,
    ingredients: &str,
    instructions: &str,
) -> Result<ViabilityAssessment, GenerationError> {
    if !config.viability_check {
        return Err(GenerationError::Disabled(Capability::ViabilityCheck));
    }

    assess_recipe_viability(
        ai_client,
        config.viability_schema,
        name,
        ingredients,
        instructions,
    )
    .await
}

/// Score a recipe with the given schema version, regardless of capability switches.
///
/// Used by the submission gate, which is not subject to the switch.
pub async fn assess_recipe_viability(
    ai_client: &dyn AiClient,
    version: ViabilitySchemaVersion,
    name: &str,
    ingredients: &str,
    instructions: &str,
) -> Result<ViabilityAssessment, GenerationError> {
    let prompt = flow::render(VIABILITY_PROMPT_NAME, || {
        render_viability_prompt(version, name, ingredients, instructions)
    });

    let assessment = match version {
        ViabilitySchemaVersion::V2 => ViabilityAssessment::V2(
            complete_json::<ViabilitySchemaV2>(ai_client, VIABILITY_PROMPT_NAME, prompt, SAMPLING)
                .await?,
        ),
        ViabilitySchemaVersion::V1 => ViabilityAssessment::V1(
            complete_json::<ViabilitySchemaV1>(ai_client, VIABILITY_PROMPT_NAME, prompt, SAMPLING)
                .await?,
        ),
    };

    tracing::info!(
        recipe = name,
        viable = assessment.is_viable(),
        "Viability check complete"
    );

    Ok(assessment)
}
