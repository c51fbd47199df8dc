//! Port for signing and verifying bearer tokens.
//!
//! Access and refresh tokens are signed with distinct secrets so one kind
//! can never be replayed as the other. Decoding checks the signature and
//! the token kind only; the caller compares `expires_at` against its clock.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Role, UserId};

use super::define_port_error;

/// Which secret a token is signed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Stable label embedded in token claims.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// Claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: UserId,
    pub role: Role,
    pub kind: TokenKind,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Unique per issuance so two tokens minted in the same second differ.
    pub jti: Uuid,
}

impl TokenClaims {
    /// Whether the token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

define_port_error! {
    /// Errors raised by token codec adapters.
    pub enum TokenCodecError {
        /// Signing failed.
        Encode { message: String } => "token signing failed: {message}",
        /// Signature, structure or kind did not check out.
        Invalid { message: String } => "token rejected: {message}",
    }
}

/// Signs and verifies bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign `claims` with the secret for `claims.kind`.
    fn encode(&self, claims: &TokenClaims) -> Result<String, TokenCodecError>;

    /// Verify `token` against the secret for `kind` and return its claims.
    fn decode(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, TokenCodecError>;
}
