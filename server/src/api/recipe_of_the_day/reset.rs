use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{extract::State, response::IntoResponse};
use remix_core::Recipe;

#[utoipa::path(
    post,
    path = "/api/recipe-of-the-day/reset",
    tag = "recipe-of-the-day",
    responses(
        (status = 200, description = "Freshly generated recipe", body = Envelope<Recipe>),
        (status = 503, description = "Regeneration failed", body = ErrorResponse)
    )
)]
pub async fn reset_recipe_of_the_day(State(actions): State<AppState>) -> impl IntoResponse {
    tracing::info!("Recipe of the day reset requested");
    respond(actions.reset_recipe_of_the_day().await)
}
