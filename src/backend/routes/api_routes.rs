/**
 * Account Routes
 *
 * ## Public
 * - `POST /api/auth/register` - Create an account
 * - `POST /api/auth/login` - Exchange credentials for a bearer token
 *
 * ## Protected
 * - `GET /api/users/me` - The authenticated user
 */

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::auth::{get_me, login, register};
use crate::backend::server::state::AppState;

pub fn configure_auth_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Must be mounted behind the auth middleware
pub fn configure_user_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api/users/me", get(get_me))
}
