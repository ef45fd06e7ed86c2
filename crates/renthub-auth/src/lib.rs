//! # renthub-auth
//!
//! Authentication for RentHub: Argon2id password hashing with a strength
//! policy, HS256 JWT access/refresh tokens with a cache-backed blocklist,
//! and the session lifecycle (register, sign-in, sign-out, refresh,
//! validation, cleanup).

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordPolicy};
pub use session::SessionManager;
