pub mod check;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/viability (mounted at /api/viability)
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(check::check_viability))
}

#[derive(OpenApi)]
#[openapi(
    paths(check::check_viability),
    components(schemas(check::ViabilityRequest, check::ViabilityResponse))
)]
pub struct ApiDoc;
