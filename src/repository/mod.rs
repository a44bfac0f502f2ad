//! Database repository layer

pub mod token_repo;
pub mod user_repo;

pub use token_repo::*;
pub use user_repo::*;
