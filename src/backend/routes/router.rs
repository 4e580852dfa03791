/**
 * Router Configuration
 *
 * Combines all route groups into the application router.
 *
 * # Route Groups
 *
 * 1. `GET /` health message
 * 2. Public auth routes (register, login)
 * 3. WebSocket route (authenticates with `?token=` during the handshake)
 * 4. Protected routes behind `auth_middleware` (users, boards, members,
 *    lists, cards, card members)
 * 5. JSON 404 fallback
 *
 * The auth middleware is attached with `route_layer`, so an unknown path
 * is a 404 rather than a 401.
 *
 * # Layers
 *
 * - `TraceLayer` for request spans
 * - `CorsLayer`: permissive when `CORS_ORIGINS` is empty, otherwise the
 *   listed origins only
 */

use axum::{
    http::{HeaderValue, Method},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::middleware::auth::auth_middleware;
use crate::backend::routes::api_routes::{configure_auth_routes, configure_user_routes};
use crate::backend::routes::board_routes::configure_board_routes;
use crate::backend::routes::realtime_routes::configure_realtime_routes;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let protected = configure_board_routes(configure_user_routes(Router::new())).route_layer(
        middleware::from_fn_with_state(app_state.clone(), auth_middleware),
    );

    let router = Router::new().route("/", get(root));
    let router = configure_auth_routes(router);
    let router = configure_realtime_routes(router);

    router
        .merge(protected)
        .fallback(fallback)
        .layer(cors_layer(&app_state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Kanban API is running" }))
}

async fn fallback() -> BackendError {
    BackendError::not_found("route")
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
