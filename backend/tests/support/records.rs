//! Domain records for seeding the Diesel adapter suites.
//!
//! Timestamps are whole seconds so they survive PostgreSQL's microsecond
//! precision unchanged.

use chrono::{DateTime, Duration, Utc};
use helpdesk::domain::{
    DisplayName, Email, Role, TicketCategory, TicketDraft, TicketId, TicketPriority, User,
    UserAccount, UserId,
};

/// A fixed instant shifted by `minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_767_600_000, 0).expect("fixture timestamp") + Duration::minutes(minutes)
}

pub fn account(name: &str, email: &str, role: Role) -> UserAccount {
    UserAccount {
        user: User {
            id: UserId::random(),
            email: Email::new(email).expect("fixture email"),
            name: DisplayName::new(name).expect("fixture name"),
            role,
            created_at: at(0),
            updated_at: at(0),
        },
        password_hash: "$argon2id$fixture".to_owned(),
        refresh_token_fingerprint: None,
    }
}

pub fn draft(owner: UserId, title: &str, created_minute: i64) -> TicketDraft {
    TicketDraft {
        id: TicketId::random(),
        owner_id: owner,
        title: title.to_owned(),
        description: format!("{title}: details"),
        category: TicketCategory::Technical,
        priority: TicketPriority::Medium,
        attachment_path: None,
        created_at: at(created_minute),
    }
}
