//! Support ticket aggregate and its lifecycle vocabulary.
//!
//! Status moves `open` → `in-progress` → `resolved`, but transitions are
//! advisory: admins may set any status at any time. `resolved_at` is only
//! ever stamped by the ticket service when an admin resolves a ticket.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AttachmentUpload, UserId, UserSummary};

/// Maximum ticket title length, in characters.
pub const TITLE_MAX: usize = 100;

/// Validation errors raised while building ticket inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("category must be one of {expected}")]
    UnknownCategory { value: String, expected: &'static str },
    #[error("status must be one of {expected}")]
    UnknownStatus { value: String, expected: &'static str },
    #[error("priority must be one of {expected}")]
    UnknownPriority { value: String, expected: &'static str },
    #[error("comment must not be empty")]
    EmptyComment,
    #[error("response must not be empty")]
    EmptyResponse,
}

impl TicketValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyDescription => "description",
            Self::UnknownCategory { .. } => "category",
            Self::UnknownStatus { .. } => "status",
            Self::UnknownPriority { .. } => "priority",
            Self::EmptyComment => "comment",
            Self::EmptyResponse => "response",
        }
    }
}

/// Generates the wire-name plumbing shared by the ticket enums.
macro_rules! wire_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident ($error:ident, $expected:literal) {
            $( $(#[$variant_meta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$variant_meta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// Accepted wire names, joined for error messages.
            pub const EXPECTED: &'static str = $expected;

            /// Stable wire name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TicketValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $( $wire => Ok(Self::$variant), )+
                    _ => Err(TicketValidationError::$error {
                        value: s.to_owned(),
                        expected: Self::EXPECTED,
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Advisory lifecycle state.
    pub enum TicketStatus (UnknownStatus, "open|in-progress|resolved") {
        #[default]
        Open => "open",
        InProgress => "in-progress",
        Resolved => "resolved",
    }
}

wire_enum! {
    /// Triage priority; new tickets default to medium.
    pub enum TicketPriority (UnknownPriority, "low|medium|high") {
        Low => "low",
        #[default]
        Medium => "medium",
        High => "high",
    }
}

wire_enum! {
    /// Area of campus life a ticket concerns.
    pub enum TicketCategory (UnknownCategory, "academic|technical|administrative|hostel|library|other") {
        Academic => "academic",
        Technical => "technical",
        Administrative => "administrative",
        Hostel => "hostel",
        Library => "library",
        #[default]
        Other => "other",
    }
}

/// Stable ticket identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Append-only admin annotation on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminComment {
    pub comment: String,
    /// [`UserSummary::deleted_account`] once the author's account is gone.
    pub admin: UserSummary,
    pub created_at: DateTime<Utc>,
}

/// Ticket aggregate as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub owner: UserSummary,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub response: Option<String>,
    pub attachment_path: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    /// Oldest first.
    pub comments: Vec<AdminComment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Record written when a ticket is first stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub id: TicketId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub attachment_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Column-level changes applied by an update. `None` leaves a column as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<TicketCategory>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub response: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl TicketChanges {
    /// An empty change set stamped with `updated_at`.
    #[must_use]
    pub const fn touch(updated_at: DateTime<Utc>) -> Self {
        Self {
            title: None,
            description: None,
            category: None,
            status: None,
            priority: None,
            response: None,
            resolved_at: None,
            updated_at,
        }
    }
}

/// Comment row appended to a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub ticket_id: TicketId,
    pub admin_id: UserId,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Unvalidated ticket creation input as received from an adapter.
#[derive(Debug, Clone, Default)]
pub struct CreateTicketInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub attachment: Option<AttachmentUpload>,
}

/// Unvalidated partial update as received from an adapter.
///
/// Clients may also send `resolvedAt`; adapters drop it because the
/// timestamp is only ever stamped by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub response: Option<String>,
    pub admin_comment: Option<String>,
}

impl TicketPatch {
    /// Drop the fields only admins may change.
    #[must_use]
    pub fn restrict_to_owner_fields(self) -> Self {
        Self {
            title: self.title,
            description: self.description,
            category: self.category,
            ..Self::default()
        }
    }
}

/// Trimmed, bounded, non-empty title.
pub fn validate_title(raw: &str) -> Result<String, TicketValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(TicketValidationError::EmptyTitle);
    }
    if title.chars().count() > TITLE_MAX {
        return Err(TicketValidationError::TitleTooLong { max: TITLE_MAX });
    }
    Ok(title.to_owned())
}

/// Trimmed, non-empty description.
pub fn validate_description(raw: &str) -> Result<String, TicketValidationError> {
    let description = raw.trim();
    if description.is_empty() {
        return Err(TicketValidationError::EmptyDescription);
    }
    Ok(description.to_owned())
}
