use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderName, HeaderValue},
    response::IntoResponse,
};
use remix_core::Recipe;

pub const GENERATED_AT_HEADER: HeaderName = HeaderName::from_static("x-generated-at");

#[utoipa::path(
    get,
    path = "/api/recipe-of-the-day",
    tag = "recipe-of-the-day",
    responses(
        (status = 200, description = "Today's recipe, with a photo", body = Envelope<Recipe>,
            headers(("x-generated-at" = String, description = "RFC 3339 time the recipe was generated"))),
        (status = 503, description = "Regeneration failed", body = ErrorResponse)
    )
)]
pub async fn get_recipe_of_the_day(State(actions): State<AppState>) -> impl IntoResponse {
    let result = actions.recipe_of_the_day_entry().await;
    let generated_at = result.data().map(|entry| entry.generated_at);
    let mut response = respond(result.map(|entry| entry.recipe));

    if let Some(value) = generated_at.and_then(|at| HeaderValue::from_str(&at.to_rfc3339()).ok()) {
        response.headers_mut().insert(GENERATED_AT_HEADER, value);
    }

    response
}
