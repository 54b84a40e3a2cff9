pub mod get;
pub mod reset;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipe-of-the-day (mounted at /api/recipe-of-the-day)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get::get_recipe_of_the_day))
        .route("/reset", post(reset::reset_recipe_of_the_day))
}

#[derive(OpenApi)]
#[openapi(paths(get::get_recipe_of_the_day, reset::reset_recipe_of_the_day))]
pub struct ApiDoc;
