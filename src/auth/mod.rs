//! Authentication and authorization module

pub mod access;
pub mod middleware;
pub mod password;
pub mod token;

pub use access::authorize;
pub use middleware::{extract_token, TokenHeader, TOKEN_HEADER};
pub use password::{PasswordHasher, PasswordPolicy};
pub use token::TokenStore;
