pub mod recipe_of_the_day;
pub mod recipes;
pub mod saved_recipes;
pub mod submissions;
pub mod testing;
pub mod viability;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use remix_core::{ActionResult, FailureKind};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Failure envelope returned by every endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    pub error: String,
}

/// Success envelope returned by every endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Envelope<T> {
    /// Always true
    pub success: bool,
    pub data: T,
}

/// HTTP status for a failed action.
pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::Precondition => StatusCode::BAD_REQUEST,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::Duplicate => StatusCode::CONFLICT,
        FailureKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        FailureKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Render an action result as its JSON envelope with a matching status code.
pub fn respond<T: Serialize>(result: ActionResult<T>) -> Response {
    let status = result
        .failure()
        .map(|f| status_for(f.kind))
        .unwrap_or(StatusCode::OK);
    (status, Json(result)).into_response()
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Recipe Remix API", description = "Recipe generation, viability checks and the recipe of the day"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        testing::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        viability::ApiDoc::openapi(),
        recipe_of_the_day::ApiDoc::openapi(),
        submissions::ApiDoc::openapi(),
        saved_recipes::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
