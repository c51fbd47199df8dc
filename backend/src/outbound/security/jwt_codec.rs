//! HS256 JSON Web Token implementation of the `TokenCodec` port.
//!
//! Expiry is checked by the caller against its clock; the codec only checks
//! the signature, the claim shapes and the `kind` claim.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenClaims, TokenCodec, TokenCodecError, TokenKind};
use crate::domain::{Role, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    role: String,
    kind: String,
    iat: i64,
    exp: i64,
    jti: String,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Token codec with one secret per [`TokenKind`].
pub struct JwtTokenCodec {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
}

impl JwtTokenCodec {
    #[must_use]
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        Self {
            access: KeyPair::from_secret(access_secret),
            refresh: KeyPair::from_secret(refresh_secret),
            validation,
        }
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}

fn timestamp(secs: i64, claim: &str) -> Result<DateTime<Utc>, TokenCodecError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| TokenCodecError::invalid(format!("{claim} out of range")))
}

impl TokenCodec for JwtTokenCodec {
    fn encode(&self, claims: &TokenClaims) -> Result<String, TokenCodecError> {
        let wire = WireClaims {
            sub: claims.subject.to_string(),
            role: claims.role.as_str().to_owned(),
            kind: claims.kind.as_str().to_owned(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
            jti: claims.jti.to_string(),
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &wire,
            &self.keys(claims.kind).encoding,
        )
        .map_err(|err| TokenCodecError::encode(err.to_string()))
    }

    fn decode(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, TokenCodecError> {
        let wire = jsonwebtoken::decode::<WireClaims>(
            token,
            &self.keys(kind).decoding,
            &self.validation,
        )
        .map_err(|err| TokenCodecError::invalid(err.to_string()))?
        .claims;

        if wire.kind != kind.as_str() {
            return Err(TokenCodecError::invalid(format!(
                "expected {} token, found {}",
                kind.as_str(),
                wire.kind
            )));
        }
        Ok(TokenClaims {
            subject: UserId::new(&wire.sub)
                .map_err(|err| TokenCodecError::invalid(err.to_string()))?,
            role: wire
                .role
                .parse::<Role>()
                .map_err(|err| TokenCodecError::invalid(err.to_string()))?,
            kind,
            issued_at: timestamp(wire.iat, "iat")?,
            expires_at: timestamp(wire.exp, "exp")?,
            jti: Uuid::parse_str(&wire.jti)
                .map_err(|err| TokenCodecError::invalid(err.to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_timestamp;
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    #[fixture]
    fn codec() -> JwtTokenCodec {
        JwtTokenCodec::new(
            b"access-secret-access-secret-access",
            b"refresh-secret-refresh-secret-refresh",
        )
    }

    fn claims(kind: TokenKind) -> TokenClaims {
        TokenClaims {
            subject: UserId::random(),
            role: Role::Admin,
            kind,
            issued_at: fixture_timestamp(),
            expires_at: fixture_timestamp() + TimeDelta::minutes(15),
            jti: Uuid::new_v4(),
        }
    }

    #[rstest]
    #[case(TokenKind::Access)]
    #[case(TokenKind::Refresh)]
    fn decode_restores_encoded_claims(codec: JwtTokenCodec, #[case] kind: TokenKind) {
        let original = claims(kind);
        let token = codec.encode(&original).expect("encode");

        let decoded = codec.decode(kind, &token).expect("decode");
        assert_eq!(decoded, original);
    }

    #[rstest]
    fn tokens_of_one_kind_are_rejected_as_the_other(codec: JwtTokenCodec) {
        let token = codec.encode(&claims(TokenKind::Refresh)).expect("encode");
        let err = codec
            .decode(TokenKind::Access, &token)
            .expect_err("wrong secret");
        assert!(matches!(err, TokenCodecError::Invalid { .. }));
    }

    #[rstest]
    fn expired_tokens_still_decode(codec: JwtTokenCodec) {
        let mut stale = claims(TokenKind::Access);
        stale.issued_at -= TimeDelta::days(30);
        stale.expires_at -= TimeDelta::days(30);
        let token = codec.encode(&stale).expect("encode");

        let decoded = codec.decode(TokenKind::Access, &token).expect("decode");
        assert!(decoded.is_expired_at(fixture_timestamp()));
    }

    #[rstest]
    #[case("")]
    #[case("not.a.jwt")]
    fn garbage_is_invalid(codec: JwtTokenCodec, #[case] token: &str) {
        let err = codec.decode(TokenKind::Access, token).expect_err("invalid");
        assert!(matches!(err, TokenCodecError::Invalid { .. }));
    }
}
