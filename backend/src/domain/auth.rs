//! Authentication primitives: login credentials, registrations and the
//! session credential pair handed back to clients.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use zeroize::Zeroizing;

use super::{DisplayName, Email, Role, User, UserValidationError};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Default access token lifetime, in minutes.
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Refresh token lifetime, in days. The refresh cookie uses the same age.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by the credential service.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use helpdesk::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Campus.edu", "pw123456")
///     .expect("valid credentials");
/// assert_eq!(creds.email(), "ada@campus.edu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email suitable for lookups.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised while validating a registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("{0}")]
    InvalidName(UserValidationError),
    #[error("role must be one of student, admin")]
    InvalidRole { value: String },
}

/// Which roles public registration may grant.
///
/// Admins are normally created by promoting a registered student; opening
/// admin sign-up exists for bootstrapping the first admin account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrationPolicy {
    #[default]
    StudentsOnly,
    AnyRole,
}

impl RegistrationPolicy {
    /// Whether a self-service registration may request `role`.
    #[must_use]
    pub const fn permits(self, role: Role) -> bool {
        matches!((self, role), (Self::AnyRole, _) | (_, Role::Student))
    }
}

/// A validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: Email,
    pub name: DisplayName,
    pub role: Role,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration inputs. `role` defaults to student.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        name: &str,
        role: Option<&str>,
    ) -> Result<Self, RegistrationValidationError> {
        let email = Email::new(email).map_err(|_| RegistrationValidationError::InvalidEmail)?;
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(RegistrationValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        let name = DisplayName::new(name).map_err(RegistrationValidationError::InvalidName)?;
        let role = match role {
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|_| RegistrationValidationError::InvalidRole {
                    value: raw.to_owned(),
                })?,
            None => Role::default(),
        };

        Ok(Self {
            email,
            name,
            role,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Plain-text password awaiting hashing.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Credential pair issued on register, login and refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}
