//! Authentication Module
//!
//! Accounts, password hashing, session tokens and the HTTP handlers that
//! tie them together.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model, bcrypt helpers
//! ├── sessions.rs     - TokenService (JWT issue/verify)
//! └── handlers/       - register, login, me
//! ```
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt on the blocking pool
//! - Tokens are HS256 JWTs expiring after `JWT_EXPIRE_MINUTES`
//! - Invalid credentials return 401 without saying which part was wrong

/// User data model and password hashing
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
pub use handlers::{get_me, login, register};
pub use sessions::{Claims, TokenError, TokenService};
