//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and `bb8`
//! connection pooling.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) are internal
//! details and never reach the domain layer. Every database failure is mapped
//! to the owning port's error type.
//!
//! # Example
//!
//! ```ignore
//! use helpdesk::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let config = PoolConfig::new("postgres://localhost/helpdesk");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_faq_repository;
mod diesel_ticket_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_faq_repository::DieselFaqRepository;
pub use diesel_ticket_repository::DieselTicketRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
