use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

/// The full API router. Everything except `/health` requires a bearer token.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/courses", get(routes::courses::course_views))
        .route("/courses/{id}/bookmark", post(routes::courses::toggle_bookmark))
        .route("/courses/{id}/save", post(routes::courses::save))
        .route("/journeys", get(routes::journeys::journey_views))
        .route("/journeys/{id}", get(routes::journeys::journey_detail))
        .route("/journeys/{id}/bookmark", post(routes::journeys::toggle_bookmark))
        .route("/journeys/{id}/save", post(routes::journeys::save))
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
