//! In-memory adapters for development runs and end-to-end tests.
//!
//! All three repositories share one [`MemoryStore`] so deleting a user can
//! cascade to their tickets and comments the way the SQL schema does. Each
//! collection sits behind its own `std::sync::Mutex`; when more than one is
//! needed, locks are always taken in the order users, tickets, faqs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

mod faqs;
mod tickets;
mod users;

pub use faqs::InMemoryFaqRepository;
pub use tickets::InMemoryTicketRepository;
pub use users::InMemoryUserRepository;

use self::tickets::StoredTicket;
use crate::domain::{Faq, UserAccount, UserId};

type Users = Arc<Mutex<Vec<UserAccount>>>;
type Tickets = Arc<Mutex<Vec<StoredTicket>>>;

/// Shared backing collections for the in-memory repositories.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Users,
    tickets: Tickets,
    faqs: Arc<Mutex<Vec<Faq>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user_repository(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(self.users.clone(), self.tickets.clone())
    }

    #[must_use]
    pub fn ticket_repository(&self) -> InMemoryTicketRepository {
        InMemoryTicketRepository::new(self.users.clone(), self.tickets.clone())
    }

    #[must_use]
    pub fn faq_repository(&self) -> InMemoryFaqRepository {
        InMemoryFaqRepository::new(self.faqs.clone())
    }
}

/// Lock a collection, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn find_account<'a>(users: &'a [UserAccount], id: &UserId) -> Option<&'a UserAccount> {
    users.iter().find(|account| account.user.id == *id)
}
