use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use remix_core::{Recipe, StoredRecord};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A saved recipe with its id and save time.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipeItem {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub recipe: Recipe,
}

impl From<StoredRecord<Recipe>> for SavedRecipeItem {
    fn from(stored: StoredRecord<Recipe>) -> Self {
        Self {
            id: stored.id,
            created_at: stored.created_at,
            recipe: stored.record,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/saved-recipes",
    tag = "saved-recipes",
    responses(
        (status = 200, description = "Saved recipes, oldest first", body = Envelope<Vec<SavedRecipeItem>>),
        (status = 500, description = "Store could not be read", body = ErrorResponse)
    )
)]
pub async fn list_saved(State(actions): State<AppState>) -> impl IntoResponse {
    let result = actions.list_saved().await;
    respond(result.map(|all| all.into_iter().map(SavedRecipeItem::from).collect::<Vec<_>>()))
}
