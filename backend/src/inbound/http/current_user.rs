//! Extractor resolving the signed-in user from the session.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::login_service::map_user_persistence_error;
use crate::domain::{Error, User};

use super::session::SessionContext;
use super::state::HttpState;

/// The user behind the request, or `None` for anonymous visitors.
///
/// A session pointing at a user that no longer exists is treated as
/// anonymous.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(Option<User>);

impl CurrentUser {
    /// Wrap an already resolved identity.
    pub fn new(user: Option<User>) -> Self {
        Self(user)
    }

    /// Signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    /// Consume the wrapper.
    pub fn into_inner(self) -> Option<User> {
        self.0
    }

    /// The signed-in admin, or `Forbidden` with `message`.
    pub fn require_admin(&self, message: &str) -> Result<&User, Error> {
        self.user()
            .filter(|user| user.is_admin())
            .ok_or_else(|| Error::forbidden(message))
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let session = session.await?;
            let state = state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            let Some(user_id) = session.user_id()? else {
                return Ok(Self(None));
            };
            let user = state
                .users
                .find_by_id(user_id)
                .await
                .map_err(map_user_persistence_error)?;
            if user.is_none() {
                debug!(%user_id, "session refers to an unknown user");
            }
            Ok(Self(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use rstest::rstest;

    #[rstest]
    #[case(None, false)]
    #[case(Some(User::new(UserId::new(2), "bob@example.com", "h", false)), false)]
    #[case(Some(User::new(UserId::new(1), "ada@example.com", "h", true)), true)]
    fn only_admins_pass_the_gate(#[case] user: Option<User>, #[case] allowed: bool) {
        let current = CurrentUser::new(user);
        let result = current.require_admin("You do not have permission to edit this value");
        assert_eq!(result.is_ok(), allowed);
        if let Err(err) = result {
            assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
        }
    }
}
