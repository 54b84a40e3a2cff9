pub mod clear;
pub mod delete;
pub mod list;
pub mod save;

use crate::AppState;
use axum::routing::{delete, get};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/saved-recipes (mounted at /api/saved-recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::list_saved)
                .post(save::save_recipe)
                .delete(clear::clear_saved),
        )
        .route("/{id}", delete(delete::delete_saved))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_saved,
        save::save_recipe,
        clear::clear_saved,
        delete::delete_saved,
    ),
    components(schemas(list::SavedRecipeItem, clear::ClearedResponse))
)]
pub struct ApiDoc;
