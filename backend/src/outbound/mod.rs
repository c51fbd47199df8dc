//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: mutex-guarded repositories for development and tests
//! - **attachments**: local upload directory for ticket attachments
//! - **security**: Argon2 password hashing and JWT token signing
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod attachments;
pub mod memory;
pub mod persistence;
pub mod security;
