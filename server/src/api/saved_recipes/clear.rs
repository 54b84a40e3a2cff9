use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{extract::State, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClearedResponse {
    /// Number of recipes removed
    pub removed: usize,
}

#[utoipa::path(
    delete,
    path = "/api/saved-recipes",
    tag = "saved-recipes",
    responses(
        (status = 200, description = "All saved recipes removed", body = Envelope<ClearedResponse>),
        (status = 500, description = "Store could not be written", body = ErrorResponse)
    )
)]
pub async fn clear_saved(State(actions): State<AppState>) -> impl IntoResponse {
    respond(
        actions
            .clear_saved()
            .await
            .map(|removed| ClearedResponse { removed }),
    )
}
