use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use remix_core::Recipe;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VariationRequest {
    /// The recipe to vary
    pub recipe: Recipe,
    /// What to change, e.g. "make it vegan"
    pub variation: String,
}

#[utoipa::path(
    post,
    path = "/api/recipes/variation",
    tag = "recipes",
    request_body = VariationRequest,
    responses(
        (status = 200, description = "Complete replacement recipe", body = Envelope<Recipe>),
        (status = 400, description = "Empty variation request", body = ErrorResponse),
        (status = 503, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_variation(
    State(actions): State<AppState>,
    Json(request): Json<VariationRequest>,
) -> impl IntoResponse {
    respond(
        actions
            .generate_variation(&request.recipe, &request.variation)
            .await,
    )
}
