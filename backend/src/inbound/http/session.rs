//! Session helpers keeping handlers free of framework-specific logic.
//!
//! The cookie holds two entries: the authenticated user's id and the CSRF
//! token shared by every form rendered for that session.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const CSRF_TOKEN_KEY: &str = "csrf_token";

/// Name of the hidden form field carrying the CSRF token.
pub const CSRF_FIELD: &str = "csrf_token";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id.
    ///
    /// The session is renewed first so a pre-login cookie cannot be reused.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Current user id, if any.
    ///
    /// A malformed entry is treated as an anonymous session.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        match self.0.get::<i64>(USER_ID_KEY) {
            Ok(id) => Ok(id.map(UserId::new)),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// Drop every session entry and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// CSRF token for this session, created on first use.
    pub fn csrf_token(&self) -> Result<String, Error> {
        if let Some(token) = self.stored_csrf_token() {
            return Ok(token);
        }
        let token = Uuid::new_v4().to_string();
        self.0
            .insert(CSRF_TOKEN_KEY, &token)
            .map_err(|error| Error::internal(format!("failed to persist CSRF token: {error}")))?;
        Ok(token)
    }

    /// Check a submitted token against the session's token.
    ///
    /// Fails with `Forbidden` when the session has no token or the tokens
    /// differ.
    pub fn verify_csrf(&self, submitted: &str) -> Result<(), Error> {
        match self.stored_csrf_token() {
            Some(expected) if !submitted.is_empty() && expected == submitted => Ok(()),
            _ => {
                debug!("CSRF token mismatch");
                Err(Error::forbidden("invalid CSRF token"))
            }
        }
    }

    fn stored_csrf_token(&self) -> Option<String> {
        self.0.get::<String>(CSRF_TOKEN_KEY).ok().flatten()
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
