//! Shared fixtures for unit tests inside the crate.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    DisplayName, Email, Identity, Role, Ticket, TicketCategory, TicketId, TicketPriority,
    TicketStatus, User, UserAccount, UserId, UserSummary,
};

/// Fixed instant used by fixtures.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// A user with the given role and a name derived from it.
pub fn sample_user(role: Role) -> User {
    let id = UserId::random();
    let name = match role {
        Role::Student => "Ada Student",
        Role::Admin => "Grace Admin",
    };
    User {
        id,
        email: Email::new(format!("{}-{id}@campus.edu", role.as_str())).expect("fixture email"),
        name: DisplayName::new(name).expect("fixture name"),
        role,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

/// Stored account wrapping `user`.
pub fn sample_account(user: User, password_hash: &str) -> UserAccount {
    UserAccount {
        user,
        password_hash: password_hash.to_owned(),
        refresh_token_fingerprint: None,
    }
}

/// Identity for `user`.
pub fn identity_of(user: &User) -> Identity {
    Identity::new(user.id, user.role)
}

/// An open ticket owned by `owner`.
pub fn sample_ticket(owner: &User) -> Ticket {
    Ticket {
        id: TicketId::random(),
        owner: UserSummary::from(owner),
        title: "Projector broken".to_owned(),
        description: "The projector in room 204 does not turn on".to_owned(),
        category: TicketCategory::Technical,
        status: TicketStatus::Open,
        priority: TicketPriority::Medium,
        response: None,
        attachment_path: None,
        resolved_at: None,
        comments: Vec::new(),
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}
