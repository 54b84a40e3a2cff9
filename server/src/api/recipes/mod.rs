pub mod generate;
pub mod image;
pub mod variation;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate::generate_recipe))
        .route("/variation", post(variation::generate_variation))
        .route("/image", post(image::generate_image))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        generate::generate_recipe,
        variation::generate_variation,
        image::generate_image,
    ),
    components(schemas(
        generate::GenerateRecipeRequest,
        variation::VariationRequest,
        image::ImageRequest,
        remix_core::Recipe,
        remix_core::RecipeImage,
        remix_core::NutritionalInfo,
        remix_core::Difficulty,
    ))
)]
pub struct ApiDoc;
