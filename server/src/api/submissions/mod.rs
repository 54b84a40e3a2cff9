pub mod list;
pub mod submit;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/submissions (mounted at /api/submissions)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list::list_submissions).post(submit::submit_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(submit::submit_recipe, list::list_submissions),
    components(schemas(
        submit::SubmitRecipeRequest,
        list::SubmissionItem,
        remix_core::SubmitOutcome,
    ))
)]
pub struct ApiDoc;
