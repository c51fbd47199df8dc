//! Token and cookie configuration parsing and validation.
//!
//! This module centralises the environment-driven credential settings so they
//! are validated consistently and can be tested in isolation.

use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::ACCESS_TOKEN_TTL_MINUTES;

pub(crate) const ACCESS_SECRET_ENV: &str = "HELPDESK_ACCESS_TOKEN_SECRET";
pub(crate) const REFRESH_SECRET_ENV: &str = "HELPDESK_REFRESH_TOKEN_SECRET";
pub(crate) const ACCESS_TTL_ENV: &str = "HELPDESK_ACCESS_TOKEN_TTL_MINUTES";
pub(crate) const COOKIE_SECURE_ENV: &str = "HELPDESK_COOKIE_SECURE";
pub(crate) const SECRET_MIN_LEN: usize = 32;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const TTL_EXPECTED: &str = "a positive number of minutes";

/// Build mode for credential configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid secrets.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use helpdesk::inbound::http::auth_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Credential settings derived from configuration.
pub struct AuthSettings {
    /// HMAC secret for access tokens.
    pub access_secret: Zeroizing<Vec<u8>>,
    /// HMAC secret for refresh tokens. Always distinct from the access secret.
    pub refresh_secret: Zeroizing<Vec<u8>>,
    /// Access token lifetime in minutes.
    pub access_ttl_minutes: i64,
    /// Whether the refresh cookie is marked `Secure`.
    pub cookie_secure: bool,
}

/// Errors raised while validating credential configuration.
#[derive(thiserror::Error, Debug)]
pub enum AuthConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// A signing secret is too short for release builds.
    #[error("{name} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        name: &'static str,
        length: usize,
        min_len: usize,
    },
    /// Access and refresh tokens must not share a signing secret.
    #[error("access and refresh token secrets must differ")]
    SharedSecret,
}

/// Build credential settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use helpdesk::inbound::http::auth_config::{auth_settings_from_env, BuildMode};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "HELPDESK_ACCESS_TOKEN_SECRET" => Some("a".repeat(32)),
///     "HELPDESK_REFRESH_TOKEN_SECRET" => Some("r".repeat(32)),
///     "HELPDESK_COOKIE_SECURE" => Some("1".to_owned()),
///     _ => None,
/// });
///
/// let settings = auth_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert_eq!(settings.access_ttl_minutes, 15);
/// assert!(settings.cookie_secure);
/// ```
pub fn auth_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<AuthSettings, AuthConfigError> {
    let access_secret = secret_from_env(env, mode, ACCESS_SECRET_ENV)?;
    let refresh_secret = secret_from_env(env, mode, REFRESH_SECRET_ENV)?;
    if access_secret == refresh_secret {
        return Err(AuthConfigError::SharedSecret);
    }

    Ok(AuthSettings {
        access_secret,
        refresh_secret,
        access_ttl_minutes: access_ttl_from_env(env, mode)?,
        cookie_secure: cookie_secure_from_env(env, mode)?,
    })
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
) -> Result<Zeroizing<Vec<u8>>, AuthConfigError> {
    match env.string(name) {
        Some(value) => {
            let secret = Zeroizing::new(value.into_bytes());
            if mode == BuildMode::Release && secret.len() < SECRET_MIN_LEN {
                return Err(AuthConfigError::SecretTooShort {
                    name,
                    length: secret.len(),
                    min_len: SECRET_MIN_LEN,
                });
            }
            Ok(secret)
        }
        None => {
            if mode.is_debug() {
                warn!(variable = name, "token secret not set; using ephemeral secret (dev only)");
                Ok(ephemeral_secret())
            } else {
                Err(AuthConfigError::MissingEnv { name })
            }
        }
    }
}

fn ephemeral_secret() -> Zeroizing<Vec<u8>> {
    let mut bytes = Zeroizing::new(vec![0_u8; SECRET_MIN_LEN * 2]);
    rand::thread_rng().fill_bytes(bytes.as_mut_slice());
    bytes
}

fn access_ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<i64, AuthConfigError> {
    let Some(value) = env.string(ACCESS_TTL_ENV) else {
        return Ok(ACCESS_TOKEN_TTL_MINUTES);
    };
    match value.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid access token TTL; using default");
            Ok(ACCESS_TOKEN_TTL_MINUTES)
        }
        _ => Err(AuthConfigError::InvalidEnv {
            name: ACCESS_TTL_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, AuthConfigError> {
    match env.string(COOKIE_SECURE_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None => {
                if mode.is_debug() {
                    warn!(value = %value, "invalid HELPDESK_COOKIE_SECURE; defaulting to secure");
                    Ok(true)
                } else {
                    Err(AuthConfigError::InvalidEnv {
                        name: COOKIE_SECURE_ENV,
                        value,
                        expected: BOOL_EXPECTED,
                    })
                }
            }
        },
        None => {
            if mode.is_debug() {
                warn!("HELPDESK_COOKIE_SECURE not set; defaulting to insecure for local development");
                Ok(false)
            } else {
                Ok(true)
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
