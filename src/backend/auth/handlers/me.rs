/**
 * Current User Handler
 *
 * GET /api/users/me. The auth middleware has already resolved the bearer
 * token to a live user; this handler only shapes the response.
 */
use axum::response::Json;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::middleware::auth::AuthUser;

pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse {
        id: user.user_id,
        email: user.email,
        username: user.username,
    })
}
