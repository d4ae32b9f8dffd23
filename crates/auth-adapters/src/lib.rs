//! # auth-adapters
//!
//! Implementations of the `PasswordHasher` and `TokenIssuer` ports.
//! Argon2 hashing is always available; bearer tokens need the `auth-jwt`
//! feature.

mod password;

#[cfg(feature = "auth-jwt")]
mod jwt;

pub use password::Argon2Hasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtIssuer;
