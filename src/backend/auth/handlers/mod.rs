//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports
//! ├── types.rs    - Request and response types
//! ├── register.rs - POST /api/auth/register
//! ├── login.rs    - POST /api/auth/login
//! └── me.rs       - GET /api/users/me
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email, username, password → user created → `{id, email, username}`
//! 2. **Login**: email, password → credentials verified → `{access_token, token_type}`
//! 3. **Me**: bearer token → middleware resolves the user → `{id, email, username}`
//!
//! Unknown emails and wrong passwords both return 401 with the same message.

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Get current user handler
pub mod me;

pub use login::login;
pub use me::get_me;
pub use register::register;
