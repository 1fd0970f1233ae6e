//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod postgres;
pub mod token_vault;

pub use postgres::PgAuthRepository;
pub use token_vault::EphemeralTokenVault;
