//! Authentication Module
//!
//! This module handles user registration, login, and session tokens.
//!
//! # Architecture
//!
//! - **`users`** - User model and the `UserStore` seam (Postgres and in-memory)
//! - **`password`** - bcrypt hashing
//! - **`sessions`** - JWT access/refresh token issuance and validation
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and storage
//! ├── password.rs     - Password hashing
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email and password → user created → token pair returned
//! 2. **Login**: email and password verified → token pair returned
//! 3. **Refresh**: refresh token → new token pair with the current role
//! 4. **Me**: access token → live user record returned
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Access tokens live 15 minutes and refresh tokens 7 days by default
//! - Every authenticated request re-reads the user, so deactivation takes
//!   effect immediately
//! - Invalid credentials return 401 whether or not the email exists

/// User data model and storage
pub mod users;

/// Password hashing
pub mod password;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::{get_me, login, refresh, register};
pub use password::{PasswordError, PasswordHasher};
pub use sessions::{Claims, TokenError, TokenKind, TokenPair, TokenPayload, TokenService};
pub use users::{MemoryUserStore, NewUser, PgUserStore, Role, User, UserStore, UserStoreError};
