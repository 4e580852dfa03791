/**
 * Authentication Middleware
 *
 * Protects every route that needs a caller identity. The bearer token in
 * the `Authorization` header is verified and resolved to a live user
 * record; the result is attached to the request as [`AuthenticatedUser`].
 *
 * A token for a user that no longer exists is rejected the same as a bad
 * signature: 401.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

const INVALID_CREDENTIALS: &str = "Could not validate credentials";

/// Authenticated user data resolved from the bearer token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
}

/// Authentication middleware
///
/// 1. Extracts the token from `Authorization: Bearer <token>`
/// 2. Verifies signature and expiry
/// 3. Loads the user the token names
/// 4. Attaches [`AuthenticatedUser`] to the request extensions
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Missing or malformed Authorization header");
            BackendError::unauthenticated("Not authenticated")
        })?;

    let user_id = app_state.tokens.user_id_from_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthenticated(INVALID_CREDENTIALS)
    })?;

    let user = app_state.store.user_by_id(user_id).await?.ok_or_else(|| {
        tracing::warn!(%user_id, "Token names a user that does not exist");
        BackendError::unauthenticated(INVALID_CREDENTIALS)
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        username: user.username,
    });

    Ok(next.run(request).await)
}

/// Read the user set by [`auth_middleware`] from a request
pub fn extract_authenticated_user(request: &Request) -> Result<AuthenticatedUser, BackendError> {
    request
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| BackendError::unauthenticated("Not authenticated"))
}

/// Axum extractor for the authenticated user
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthenticated("Not authenticated")
            })
    }
}
