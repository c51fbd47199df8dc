//! Role and ownership checks shared by every service.
//!
//! All access rules funnel through [`authorize`] and
//! [`authorize_owner_or_admin`] so a rule change lands in one place.

use super::{Error, Role, UserId};

/// Authenticated caller resolved from a bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    /// Construct an identity.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Whether the caller holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Require `identity` to hold exactly `required`.
///
/// # Examples
/// ```
/// use helpdesk::domain::{authorize, ErrorCode, Identity, Role, UserId};
///
/// let student = Identity::new(UserId::random(), Role::Student);
/// assert!(authorize(&student, Role::Student).is_ok());
/// let err = authorize(&student, Role::Admin).expect_err("students are not admins");
/// assert_eq!(err.code(), ErrorCode::Forbidden);
/// ```
pub fn authorize(identity: &Identity, required: Role) -> Result<(), Error> {
    if identity.role == required {
        Ok(())
    } else {
        Err(Error::forbidden(format!("{required} role required")))
    }
}

/// Require `identity` to own the resource or hold the admin role.
pub fn authorize_owner_or_admin(identity: &Identity, owner: &UserId) -> Result<(), Error> {
    if identity.is_admin() || identity.user_id == *owner {
        Ok(())
    } else {
        Err(Error::forbidden("not authorised to access this resource"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Student, Role::Student, true)]
    #[case(Role::Admin, Role::Admin, true)]
    #[case(Role::Student, Role::Admin, false)]
    #[case(Role::Admin, Role::Student, false)]
    fn authorize_requires_exact_role(
        #[case] held: Role,
        #[case] required: Role,
        #[case] allowed: bool,
    ) {
        let identity = Identity::new(UserId::random(), held);
        let result = authorize(&identity, required);
        match (allowed, result) {
            (true, Ok(())) => {}
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Forbidden),
            (expected, got) => panic!("expected allowed={expected}, got {got:?}"),
        }
    }

    #[rstest]
    fn owner_is_allowed() {
        let owner = UserId::random();
        let identity = Identity::new(owner, Role::Student);
        assert!(authorize_owner_or_admin(&identity, &owner).is_ok());
    }

    #[rstest]
    fn admin_is_allowed_for_any_owner() {
        let identity = Identity::new(UserId::random(), Role::Admin);
        assert!(authorize_owner_or_admin(&identity, &UserId::random()).is_ok());
    }

    #[rstest]
    fn stranger_is_forbidden() {
        let identity = Identity::new(UserId::random(), Role::Student);
        let err = authorize_owner_or_admin(&identity, &UserId::random())
            .expect_err("stranger must be rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
