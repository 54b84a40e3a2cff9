use crate::api::{respond, Envelope, ErrorResponse};
use crate::AppState;
use axum::{extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use remix_core::{StoredRecord, SubmittedRecipe};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionItem {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub recipe_name: String,
    pub ingredients: String,
    pub instructions: String,
}

impl From<StoredRecord<SubmittedRecipe>> for SubmissionItem {
    fn from(stored: StoredRecord<SubmittedRecipe>) -> Self {
        Self {
            id: stored.id,
            created_at: stored.created_at,
            recipe_name: stored.record.name,
            ingredients: stored.record.ingredients,
            instructions: stored.record.instructions,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/submissions",
    tag = "submissions",
    responses(
        (status = 200, description = "Accepted submissions, oldest first", body = Envelope<Vec<SubmissionItem>>),
        (status = 500, description = "Store could not be read", body = ErrorResponse)
    )
)]
pub async fn list_submissions(State(actions): State<AppState>) -> impl IntoResponse {
    let result = actions.list_submissions().await;
    respond(result.map(|all| all.into_iter().map(SubmissionItem::from).collect::<Vec<_>>()))
}
