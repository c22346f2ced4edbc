//! 라우터 구성

use crate::config::Config;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    response::{Html, Json},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// 전체 HTTP 라우터
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route(
            "/participants",
            post(handlers::handle_register).get(handlers::handle_list_participants),
        )
        .route(
            "/messages",
            post(handlers::handle_post_message).get(handlers::handle_list_messages),
        )
        .route(
            "/messages/:id",
            put(handlers::handle_edit_message).delete(handlers::handle_delete_message),
        )
        .route("/status", post(handlers::handle_status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// CORS 설정
fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

async fn index_handler() -> Html<&'static str> {
    Html("<h1>Bate-Papo</h1><p>Endpoints: /participants, /messages, /status</p>")
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "server": "bate-papo-rs",
        "timestamp": chrono::Utc::now().timestamp()
    }))
}
