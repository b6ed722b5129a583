//! Axum router construction for the API server.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for the separately served `TypeScript` frontend.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the API server.
///
/// Note the two-in-one plan routes: `POST /api/users/{u}/plans/{name}`
/// reads `{name}` as a *game* name (create), while `GET`/`DELETE` on the
/// same path read it as a *plan* name — mirroring the frontend's existing
/// call contract.
///
/// CORS is configured to allow any origin for development. In production
/// this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // REST API
        .route("/api/version", get(handlers::version))
        .route("/api/games", get(handlers::list_games))
        .route("/api/games/{game_name}", get(handlers::get_game))
        .route(
            "/api/users/{username}",
            post(handlers::create_user).get(handlers::user_exists),
        )
        .route(
            "/api/users/{username}/plans",
            get(handlers::list_plans)
                .put(handlers::update_plan)
                .post(handlers::clone_plan),
        )
        .route(
            "/api/users/{username}/plans/{name}",
            get(handlers::get_plan)
                .post(handlers::create_plan)
                .delete(handlers::delete_plan),
        )
        .route("/api/evaluate", post(handlers::evaluate_stages))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
