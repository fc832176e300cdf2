use axum::{
    middleware,
    routing::{get, patch},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::middleware::{cors_layer, metrics_middleware};
use super::{handlers, services};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Frontend static files path (configurable via env)
    let dashboard_dir =
        std::env::var("DASHBOARD_DIR").unwrap_or_else(|_| "frontend/dist".to_string());

    let cors = cors_layer(&state.config().cors);

    // API routes
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Attendants
        .route("/attendants", get(handlers::list_attendants))
        // Services
        .route(
            "/services",
            get(services::list_services).post(services::create_service),
        )
        .route("/services/next/{type}", patch(services::next_service))
        // {key} is a status for GET and a service id for PATCH
        .route(
            "/services/{key}",
            get(services::list_by_status).patch(services::update_service),
        )
        .route(
            "/services/{key}/{type}",
            get(services::list_by_status_and_type),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state);

    let api_routes = match cors {
        Some(cors) => api_routes.layer(cors),
        None => api_routes,
    };

    // Serve frontend with SPA fallback
    let index_path = format!("{}/index.html", dashboard_dir);
    let serve_dir = ServeDir::new(&dashboard_dir).fallback(ServeFile::new(&index_path));

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(serve_dir)
        .layer(TraceLayer::new_for_http())
}
