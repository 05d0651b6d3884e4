pub mod ai_roadmap;
pub mod assignments;
pub mod chat;
pub mod config;
pub mod directory;
pub mod extract;
pub mod feedback;
pub mod handlers;
pub mod models;
pub mod progress;
pub mod recommend;
pub mod roadmap;
pub mod routes;
pub mod seed;
pub mod services;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::Json,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use mentorbridge_common::ApiResponse;

pub use crate::config::AppConfig;
pub use crate::services::AppState;

/// Full application router with tracing, CORS and the JSON 404 fallback.
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    routes::create_routes()
        .fallback(handler_404)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn handler_404() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Endpoint not found".to_string())),
    )
}
