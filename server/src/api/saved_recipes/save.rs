use super::list::SavedRecipeItem;
use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use remix_core::Recipe;

#[utoipa::path(
    post,
    path = "/api/saved-recipes",
    tag = "saved-recipes",
    request_body = Recipe,
    responses(
        (status = 200, description = "Recipe saved", body = Envelope<SavedRecipeItem>),
        (status = 400, description = "Recipe has no name", body = ErrorResponse),
        (status = 409, description = "A recipe with this name is already saved", body = ErrorResponse),
        (status = 500, description = "Store could not be written", body = ErrorResponse)
    )
)]
pub async fn save_recipe(
    State(actions): State<AppState>,
    Json(recipe): Json<Recipe>,
) -> impl IntoResponse {
    respond(actions.save_recipe(recipe).await.map(SavedRecipeItem::from))
}
