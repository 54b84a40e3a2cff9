//! Router construction, shared by `main` and the router tests.

use crate::{api, AppState};
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

/// Paths that are polled often enough to drown out everything else.
const QUIET_PATHS: &[&str] = &["/api/test/ping"];

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let api_router = Router::new()
        .nest("/api/test", api::testing::router())
        .nest("/api/recipes", api::recipes::router())
        .nest("/api/viability", api::viability::router())
        .nest("/api/recipe-of-the-day", api::recipe_of_the_day::router())
        .nest("/api/submissions", api::submissions::router())
        .nest("/api/saved-recipes", api::saved_recipes::router());

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(api_router)
        .merge(swagger_ui)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    if QUIET_PATHS.contains(&matched_path) {
                        tracing::trace_span!("http_request")
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %matched_path,
                        )
                    }
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
                            return;
                        }
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, StatusCode};
    use axum::response::Response;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use remix_core::ai::{FakeAiClient, FlowConfig};
    use remix_core::{ManualClock, RecipeActions};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_with(client: FakeAiClient, config: FlowConfig) -> Router {
        let actions = RecipeActions::in_memory(
            Arc::new(client),
            config,
            Arc::new(ManualClock::new(Utc::now())),
        );
        router(Arc::new(actions))
    }

    fn app() -> Router {
        app_with(FakeAiClient::with_recipe_responses(), FlowConfig::default())
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn viable_submission() -> Value {
        json!({
            "recipeName": "Weeknight Chili",
            "ingredients": "beans, tomatoes, onion, chili powder",
            "instructions": "Soften the onion, add spices, simmer with beans and tomatoes for 40 minutes."
        })
    }

    #[tokio::test]
    async fn test_ping() {
        let response = send(app(), Method::GET, "/api/test/ping", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "data": {"message": "ping"}})
        );
    }

    #[tokio::test]
    async fn test_generate_recipe() {
        let response = send(
            app(),
            Method::POST,
            "/api/recipes/generate",
            Some(json!({"ingredients": "egg, flour, milk"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["name"], "Golden Buttermilk Pancakes");
        assert!(json["data"]["cookingTime"].is_string());
        assert_eq!(json["data"]["imageUrl"], "");
    }

    #[tokio::test]
    async fn test_generate_recipe_precondition() {
        let response = send(
            app(),
            Method::POST,
            "/api/recipes/generate",
            Some(json!({"ingredients": " , "})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "error": "Please add at least one ingredient."})
        );
    }

    #[tokio::test]
    async fn test_backend_failure_is_unavailable() {
        let app = app_with(
            FakeAiClient::new().with_default_response("not json"),
            FlowConfig::default(),
        );
        let response = send(
            app,
            Method::POST,
            "/api/recipes/generate",
            Some(json!({"ingredients": "rice"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body_json(response).await["error"],
            "Failed to generate recipe. Please try again."
        );
    }

    #[tokio::test]
    async fn test_disabled_image() {
        let config = FlowConfig {
            recipe_image: false,
            ..Default::default()
        };
        let app = app_with(FakeAiClient::with_recipe_responses(), config);
        let response = send(
            app,
            Method::POST,
            "/api/recipes/image",
            Some(json!({"recipeName": "Shakshuka"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error"], "This feature is coming soon!");
    }

    #[tokio::test]
    async fn test_viability() {
        let response = send(app(), Method::POST, "/api/viability", Some(viable_submission())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["schemaVersion"], "v2");
        assert_eq!(json["data"]["score"], 8);
        assert_eq!(json["data"]["isViable"], true);
    }

    #[tokio::test]
    async fn test_recipe_of_the_day_sets_generated_at() {
        let response = send(app(), Method::GET, "/api/recipe-of-the-day", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-generated-at"));

        let json = body_json(response).await;
        assert_eq!(json["data"]["name"], "Lemon Herb Orzo with Roasted Vegetables");
        assert!(json["data"]["imageUrl"].as_str().unwrap().starts_with("data:"));
    }

    #[tokio::test]
    async fn test_recipe_of_the_day_failure_has_no_generated_at() {
        let app = app_with(
            FakeAiClient::with_recipe_responses().with_failing_images("no quota"),
            FlowConfig::default(),
        );
        let response = send(app, Method::GET, "/api/recipe-of-the-day", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!response.headers().contains_key("x-generated-at"));
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_submissions_accepted_with_viability_check_off() {
        let config = FlowConfig {
            viability_check: false,
            ..Default::default()
        };
        let app = app_with(FakeAiClient::with_recipe_responses(), config);

        let response = send(app.clone(), Method::POST, "/api/submissions", Some(viable_submission())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["wasViable"], true);

        let response = send(app, Method::POST, "/api/viability", Some(viable_submission())).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_submit_then_list() {
        let app = app();
        let response = send(
            app.clone(),
            Method::POST,
            "/api/submissions",
            Some(viable_submission()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["wasViable"], true);

        let response = send(app, Method::GET, "/api/submissions", None).await;
        let json = body_json(response).await;
        assert_eq!(json["data"][0]["recipeName"], "Weeknight Chili");
        assert!(json["data"][0]["id"].is_string());
    }

    #[tokio::test]
    async fn test_saved_recipes_flow() {
        let app = app();
        let generated = body_json(
            send(
                app.clone(),
                Method::POST,
                "/api/recipes/generate",
                Some(json!({"ingredients": "egg, flour, milk"})),
            )
            .await,
        )
        .await;
        let recipe = generated["data"].clone();

        let saved = send(app.clone(), Method::POST, "/api/saved-recipes", Some(recipe.clone())).await;
        assert_eq!(saved.status(), StatusCode::OK);
        let id = body_json(saved).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let duplicate = send(app.clone(), Method::POST, "/api/saved-recipes", Some(recipe)).await;
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let list = body_json(send(app.clone(), Method::GET, "/api/saved-recipes", None).await).await;
        assert_eq!(list["data"].as_array().unwrap().len(), 1);
        assert_eq!(list["data"][0]["name"], "Golden Buttermilk Pancakes");

        let uri = format!("/api/saved-recipes/{id}");
        let removed = send(app.clone(), Method::DELETE, &uri, None).await;
        assert_eq!(removed.status(), StatusCode::OK);

        let missing = send(app.clone(), Method::DELETE, &uri, None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let cleared = send(app, Method::DELETE, "/api/saved-recipes", None).await;
        assert_eq!(body_json(cleared).await["data"]["removed"], 0);
    }

    #[tokio::test]
    async fn test_openapi_lists_routes() {
        let spec = api::openapi();
        for path in [
            "/api/recipes/generate",
            "/api/viability",
            "/api/recipe-of-the-day",
            "/api/saved-recipes/{id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
