//! Email to user lookup for invitations and card assignment.

use crate::backend::access::AccessError;
use crate::backend::auth::users::{normalize_email, User};
use crate::backend::store::BoardStore;

/// Find the user behind an email address, case-insensitively
pub async fn resolve_identity(store: &dyn BoardStore, email: &str) -> Result<User, AccessError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AccessError::Invalid {
            field: "email",
            message: "email must not be empty",
        });
    }
    store
        .user_by_email(&email)
        .await?
        .ok_or(AccessError::NotFound("user"))
}
