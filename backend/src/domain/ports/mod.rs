//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`AuthService`, `TicketCommand`, ...) are called by inbound
//! adapters; driven ports (`UserRepository`, `TokenCodec`, ...) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod attachment_store;
mod auth_service;
mod faq_command;
mod faq_query;
mod faq_repository;
mod password_hasher;
mod ticket_command;
mod ticket_query;
mod ticket_repository;
mod token_codec;
mod user_administration;
mod user_repository;

#[cfg(test)]
pub use attachment_store::MockAttachmentStore;
pub use attachment_store::{AttachmentStore, AttachmentStoreError, DiscardingAttachmentStore};
#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::AuthService;
#[cfg(test)]
pub use faq_command::MockFaqCommand;
pub use faq_command::FaqCommand;
#[cfg(test)]
pub use faq_query::MockFaqQuery;
pub use faq_query::FaqQuery;
#[cfg(test)]
pub use faq_repository::MockFaqRepository;
pub use faq_repository::{FaqRepository, FaqRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use ticket_command::MockTicketCommand;
pub use ticket_command::TicketCommand;
#[cfg(test)]
pub use ticket_query::MockTicketQuery;
pub use ticket_query::TicketQuery;
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{TicketRepository, TicketRepositoryError};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenClaims, TokenCodec, TokenCodecError, TokenKind};
#[cfg(test)]
pub use user_administration::MockUserAdministration;
pub use user_administration::UserAdministration;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
