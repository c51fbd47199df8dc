//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, the access rules that guard them, and the services that
//! implement the driving ports. Nothing in here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Identity, Ticket, Faq, FacultyContact: core entities.
//! - CredentialService, TicketService, FaqService, UserAdminService:
//!   driving port implementations.

pub mod attachment;
pub mod auth;
pub mod authorization;
pub mod credential_service;
pub mod error;
pub mod faculty;
pub mod faq;
pub mod faq_service;
pub mod ports;
pub mod ticket;
pub mod ticket_service;
pub mod trace_id;
pub mod user;
pub mod user_admin_service;

pub use self::attachment::{
    ATTACHMENT_EXTENSIONS, ATTACHMENT_MAX_BYTES, AttachmentUpload, AttachmentValidationError,
};
pub use self::auth::{
    ACCESS_TOKEN_TTL_MINUTES, AuthSession, LoginCredentials, LoginValidationError,
    PASSWORD_MIN_LEN, REFRESH_TOKEN_TTL_DAYS, Registration, RegistrationPolicy,
    RegistrationValidationError,
};
pub use self::authorization::{Identity, authorize, authorize_owner_or_admin};
pub use self::credential_service::{CredentialService, TokenLifetimes, refresh_fingerprint};
pub use self::error::{Error, ErrorCode};
pub use self::faculty::{FacultyContact, faculty_contact, faculty_directory};
pub use self::faq::{
    FAQ_DEFAULT_CATEGORY, Faq, FaqChanges, FaqId, FaqInput, FaqPatch, FaqValidationError,
    normalise_category, search_needle, validate_answer, validate_question,
};
pub use self::faq_service::FaqService;
pub use self::ticket::{
    AdminComment, CreateTicketInput, NewComment, TITLE_MAX, Ticket, TicketCategory,
    TicketChanges, TicketDraft, TicketId, TicketPatch, TicketPriority, TicketStatus,
    TicketValidationError, validate_description, validate_title,
};
pub use self::ticket_service::TicketService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DELETED_USER_NAME, DISPLAY_NAME_MAX, DisplayName, Email, Role, User, UserAccount, UserId,
    UserSummary, UserValidationError,
};
pub use self::user_admin_service::UserAdminService;
