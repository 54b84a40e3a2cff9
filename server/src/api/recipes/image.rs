use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use remix_core::RecipeImage;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub recipe_name: String,
}

#[utoipa::path(
    post,
    path = "/api/recipes/image",
    tag = "recipes",
    request_body = ImageRequest,
    responses(
        (status = 200, description = "Image as a URL or data URI", body = Envelope<RecipeImage>),
        (status = 400, description = "Empty recipe name", body = ErrorResponse),
        (status = 503, description = "Image generation failed or is disabled", body = ErrorResponse)
    )
)]
pub async fn generate_image(
    State(actions): State<AppState>,
    Json(request): Json<ImageRequest>,
) -> impl IntoResponse {
    respond(actions.generate_image(&request.recipe_name).await)
}
