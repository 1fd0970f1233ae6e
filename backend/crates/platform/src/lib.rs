//! Platform Crate - Technical Infrastructure
//!
//! Capabilities the domain crates depend on without caring how they are
//! provided:
//! - Password hashing (Argon2id) behind `hash` / `verify`
//! - Random tokens, SHA-256 digests and HMAC-signed session tokens
//! - Cookie helpers
//! - Ephemeral key-value store with per-key TTL (Redis or in-process)
//! - Outbound mail

pub mod cookie;
pub mod crypto;
pub mod ephemeral;
pub mod mail;
pub mod password;
