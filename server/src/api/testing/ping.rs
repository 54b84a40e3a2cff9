use crate::api::{respond, Envelope};
use axum::response::IntoResponse;
use remix_core::ActionResult;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PingResponse {
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/test/ping",
    tag = "testing",
    responses(
        (status = 200, description = "Liveness check", body = Envelope<PingResponse>)
    )
)]
pub async fn ping() -> impl IntoResponse {
    respond(ActionResult::Success(PingResponse {
        message: "ping".to_string(),
    }))
}
