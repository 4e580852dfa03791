/**
 * Registration Handler
 *
 * POST /api/auth/register
 *
 * # Registration Process
 *
 * 1. Normalize the email (trimmed, lowercase) and trim the username
 * 2. Validate email, username and password
 * 3. Hash the password with bcrypt
 * 4. Insert the user; duplicate email or username is a 409
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::{RegisterRequest, UserResponse};
use crate::backend::auth::users::{hash_password, normalize_email, NewUser};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::SharedError;

const MAX_USERNAME_LEN: usize = 50;

fn validate_registration(email: &str, username: &str, password: &str) -> Result<(), SharedError> {
    let (local, domain) = email.split_once('@').unwrap_or(("", ""));
    if local.is_empty() || domain.is_empty() {
        return Err(SharedError::validation("email", "Invalid email format"));
    }
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(SharedError::validation(
            "username",
            format!("Username must be 1-{} characters", MAX_USERNAME_LEN),
        ));
    }
    if password.is_empty() {
        return Err(SharedError::validation("password", "Password must not be empty"));
    }
    Ok(())
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), BackendError> {
    let email = normalize_email(&request.email);
    let username = request.username.trim().to_string();
    tracing::info!("Register request for username: {}, email: {}", username, email);

    validate_registration(&email, &username, &request.password)?;

    let password_hash = hash_password(request.password, state.config.bcrypt_cost).await?;
    let user = state
        .store
        .create_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered: {}", user.email);
    Ok((StatusCode::CREATED, Json(user.into())))
}
