use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use remix_core::{SubmitOutcome, SubmittedRecipe};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRecipeRequest {
    pub recipe_name: String,
    pub ingredients: String,
    pub instructions: String,
}

#[utoipa::path(
    post,
    path = "/api/submissions",
    tag = "submissions",
    request_body = SubmitRecipeRequest,
    responses(
        (status = 200, description = "Whether the recipe was viable and stored", body = Envelope<SubmitOutcome>),
        (status = 400, description = "Recipe text too short", body = ErrorResponse),
        (status = 500, description = "Viable but could not be saved", body = ErrorResponse),
        (status = 503, description = "Viability check failed or is disabled", body = ErrorResponse)
    )
)]
pub async fn submit_recipe(
    State(actions): State<AppState>,
    Json(request): Json<SubmitRecipeRequest>,
) -> impl IntoResponse {
    let submission = SubmittedRecipe {
        name: request.recipe_name,
        ingredients: request.ingredients,
        instructions: request.instructions,
    };
    respond(actions.submit_recipe(submission).await)
}
