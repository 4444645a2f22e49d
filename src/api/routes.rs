use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/recommendations",
            get(handlers::get_recommendations).post(handlers::create_recommendation),
        )
        .route("/recommendations/random", get(handlers::get_random))
        .route("/recommendations/top/:amount", get(handlers::get_top))
        .route("/recommendations/:id", get(handlers::get_recommendation))
        .route("/recommendations/:id/upvote", post(handlers::upvote))
        .route("/recommendations/:id/downvote", post(handlers::downvote));

    if state.test_routes_enabled {
        router = router.route("/testing/reset", post(handlers::reset));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
