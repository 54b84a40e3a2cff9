mod api;
mod app;
mod telemetry;

use remix_core::ai::{self, FlowConfig};
use remix_core::store;
use remix_core::RecipeActions;
use std::env;
use std::sync::Arc;

/// Application state shared across all handlers
pub type AppState = Arc<RecipeActions>;

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi()
            .to_pretty_json()
            .expect("Failed to serialize OpenAPI spec");
        println!("{}", spec);
        return;
    }

    dotenvy::dotenv().ok();
    telemetry::init_telemetry();

    let ai_client = ai::create_client_from_env().expect("Failed to configure AI client");
    let flow_config = FlowConfig::from_env().expect("Invalid flow configuration");
    tracing::info!(?flow_config, "Flow configuration loaded");

    let data_dir = store::data_dir_from_env();
    let actions: AppState = Arc::new(RecipeActions::with_json_stores(
        ai_client,
        flow_config,
        &data_dir,
    ));

    let app = app::router(actions);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}"))
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Listener has no local address");

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec available at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await.expect("Server error");
}
