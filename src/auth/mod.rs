//! Token authentication: two-tier JWT decode and identity resolution.

mod jwt;
mod token;

pub use jwt::JwtSecret;
pub use token::TokenVerifier;
