//! Bearer-token identity extraction.
//!
//! Handlers take a [`CurrentUser`] argument to require authentication. The
//! extractor reads `Authorization: Bearer <token>` and resolves it through
//! the [`AuthService`](crate::domain::ports::AuthService) port held in
//! [`HttpState`], so handlers never touch token details.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Identity};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller resolved from the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    /// Borrow the resolved identity.
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authentication required"))?
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state missing from application data"))?;
            let identity = state.auth.current_identity(&token?).await?;
            Ok(Self(identity))
        })
    }
}
