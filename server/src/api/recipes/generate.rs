use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use remix_core::Recipe;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateRecipeRequest {
    /// Comma-separated ingredient list, e.g. "eggs, spinach, feta"
    pub ingredients: String,
    /// Free-text request such as "make it spicy" or "under 30 minutes"
    #[serde(default)]
    pub customization: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/recipes/generate",
    tag = "recipes",
    request_body = GenerateRecipeRequest,
    responses(
        (status = 200, description = "Generated recipe", body = Envelope<Recipe>),
        (status = 400, description = "No usable ingredients", body = ErrorResponse),
        (status = 503, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_recipe(
    State(actions): State<AppState>,
    Json(request): Json<GenerateRecipeRequest>,
) -> impl IntoResponse {
    respond(
        actions
            .generate_recipe(&request.ingredients, request.customization.as_deref())
            .await,
    )
}
