//! Middleware Module
//!
//! HTTP middleware applied by the router.
//!
//! - **`auth`** - Bearer-token authentication for protected routes
//!
//! Request tracing and CORS come from `tower-http` and are layered in
//! `routes::router`.

pub mod auth;

pub use auth::{auth_middleware, extract_authenticated_user, AuthUser, AuthenticatedUser};
