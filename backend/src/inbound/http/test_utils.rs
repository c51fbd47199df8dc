//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockAuthService, MockFaqCommand, MockFaqQuery, MockTicketCommand, MockTicketQuery,
    MockUserAdministration,
};
use crate::domain::{Faq, FaqId, Identity, Role, User};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::test_support::{fixture_timestamp, identity_of, sample_user};

/// Mock ports for handler tests; unset mocks panic on any call.
#[derive(Default)]
pub struct TestPorts {
    pub auth: MockAuthService,
    pub tickets: MockTicketCommand,
    pub tickets_query: MockTicketQuery,
    pub faqs: MockFaqCommand,
    pub faqs_query: MockFaqQuery,
    pub users: MockUserAdministration,
}

impl TestPorts {
    /// Ports whose auth mock resolves every bearer token to `identity`.
    pub fn authenticated_as(identity: Identity) -> Self {
        let mut auth = MockAuthService::new();
        auth.expect_current_identity()
            .returning(move |_| Ok(identity));
        Self {
            auth,
            ..Self::default()
        }
    }

    /// Wrap the mocks into shared handler state.
    pub fn into_data(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            HttpStatePorts {
                auth: Arc::new(self.auth),
                tickets: Arc::new(self.tickets),
                tickets_query: Arc::new(self.tickets_query),
                faqs: Arc::new(self.faqs),
                faqs_query: Arc::new(self.faqs_query),
                users: Arc::new(self.users),
            },
            false,
        ))
    }
}

/// A user with `role` together with their resolved identity.
pub fn caller(role: Role) -> (User, Identity) {
    let user = sample_user(role);
    let identity = identity_of(&user);
    (user, identity)
}

/// FAQ entry with the given question.
pub fn faq(question: &str) -> Faq {
    let now = fixture_timestamp();
    Faq {
        id: FaqId::random(),
        question: question.to_owned(),
        answer: "See the student portal.".to_owned(),
        category: "General".to_owned(),
        created_at: now,
        updated_at: now,
    }
}
