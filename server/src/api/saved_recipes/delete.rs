use super::list::SavedRecipeItem;
use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/saved-recipes/{id}",
    tag = "saved-recipes",
    params(
        ("id" = Uuid, Path, description = "Saved recipe ID")
    ),
    responses(
        (status = 200, description = "The removed recipe", body = Envelope<SavedRecipeItem>),
        (status = 404, description = "Saved recipe not found", body = ErrorResponse),
        (status = 500, description = "Store could not be written", body = ErrorResponse)
    )
)]
pub async fn delete_saved(
    State(actions): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    respond(actions.remove_saved(id).await.map(SavedRecipeItem::from))
}
