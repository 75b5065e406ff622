use axum::{routing::get, Json, Router};
use serde::Deserialize;
use service::services::{FileService, JsonFileService};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

pub mod files;
pub mod json;

/// Shared handler state: one service per endpoint set, both over the same byte store.
#[derive(Clone)]
pub struct AppState {
    pub files: FileService,
    pub json: JsonFileService,
}

/// JSON body accepted by the create and update endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FileInput {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health plus both file endpoint sets.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let file_routes = Router::new()
        .route("/files", get(files::list_files).post(files::create_file))
        .route(
            "/files/:name",
            get(files::read_file).put(files::update_file).delete(files::delete_file),
        );

    let json_routes = Router::new()
        .route(
            "/json",
            get(json::list_json).post(json::create_json).delete(json::delete_json_without_name),
        )
        .route(
            "/json/:name",
            get(json::read_json).put(json::update_json).delete(json::delete_json),
        );

    Router::new()
        .route("/health", get(health))
        .merge(file_routes)
        .merge(json_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use service::storage::MemoryByteStore;
    use tower::ServiceExt;

    use super::*;

    pub fn app() -> (Arc<MemoryByteStore>, Router) {
        let store = Arc::new(MemoryByteStore::new());
        let state = AppState {
            files: FileService::new(store.clone()),
            json: JsonFileService::new(store.clone(), "app"),
        };
        (store, build_router(state, CorsLayer::very_permissive()))
    }

    /// Send one request through the router and decode the JSON body.
    pub async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        let res = app.clone().oneshot(req).await.expect("response");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).expect("json body") };
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use super::test_support::{app, call};

    #[tokio::test]
    async fn health_is_ok() {
        let (_, app) = app();
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
