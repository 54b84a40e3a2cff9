use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use remix_core::ViabilityAssessment;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityRequest {
    pub recipe_name: String,
    pub ingredients: String,
    pub instructions: String,
}

/// Viability verdict. `score` and `feedback` are set for schema v2,
/// `reasoning` and `suggestions` for v1.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityResponse {
    /// "v1" or "v2"
    pub schema_version: String,
    pub is_viable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<String>,
}

impl From<ViabilityAssessment> for ViabilityResponse {
    fn from(assessment: ViabilityAssessment) -> Self {
        let schema_version = assessment.version().as_str().to_string();
        match assessment {
            ViabilityAssessment::V2(report) => Self {
                schema_version,
                is_viable: report.is_viable,
                score: Some(report.score),
                feedback: Some(report.feedback),
                reasoning: None,
                suggestions: None,
            },
            ViabilityAssessment::V1(report) => Self {
                schema_version,
                is_viable: report.is_viable,
                score: None,
                feedback: None,
                reasoning: Some(report.reasoning),
                suggestions: Some(report.suggestions),
            },
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/viability",
    tag = "viability",
    request_body = ViabilityRequest,
    responses(
        (status = 200, description = "Viability verdict", body = Envelope<ViabilityResponse>),
        (status = 400, description = "Recipe text too short", body = ErrorResponse),
        (status = 503, description = "Check failed or is disabled", body = ErrorResponse)
    )
)]
pub async fn check_viability(
    State(actions): State<AppState>,
    Json(request): Json<ViabilityRequest>,
) -> impl IntoResponse {
    let result = actions
        .check_viability(
            &request.recipe_name,
            &request.ingredients,
            &request.instructions,
        )
        .await;
    respond(result.map(ViabilityResponse::from))
}
