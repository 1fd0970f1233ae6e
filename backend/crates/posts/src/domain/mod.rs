//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Post, Author, FeedPost)
//! - Domain value objects (VoteValue, Cursor, PageLimit)
//! - Domain services (vote delta policy, feed page splitting)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
