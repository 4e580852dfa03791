/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * Looks the user up by email, verifies the bcrypt hash and issues a bearer
 * token. An unknown email and a wrong password produce the same 401 so the
 * endpoint does not reveal which accounts exist.
 */
use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{LoginRequest, TokenResponse};
use crate::backend::auth::users::{normalize_email, verify_password};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

const BAD_CREDENTIALS: &str = "Incorrect email or password";

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, BackendError> {
    let email = normalize_email(&request.email);
    tracing::info!("Login request for email: {}", email);

    let user = match state.store.user_by_email(&email).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login failed - user not found: {}", email);
            return Err(BackendError::unauthenticated(BAD_CREDENTIALS));
        }
    };

    if !verify_password(request.password, user.password_hash.clone()).await? {
        tracing::warn!(user_id = %user.id, "Login failed - invalid password");
        return Err(BackendError::unauthenticated(BAD_CREDENTIALS));
    }

    let token = state.tokens.create_token(user.id, &user.email).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::internal("failed to issue token")
    })?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(TokenResponse::bearer(token)))
}
