//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

/// Name of the session cookie in tests and production.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Session middleware with a fresh key and the `Secure` flag off, so cookies
/// survive plain-HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

/// Handler returning the session's CSRF token as the body, so tests can
/// submit forms without scraping HTML.
pub async fn issue_csrf_token(
    session: super::session::SessionContext,
) -> Result<actix_web::HttpResponse, crate::domain::Error> {
    let token = session.csrf_token()?;
    Ok(actix_web::HttpResponse::Ok().body(token))
}

/// Handler signing the session in as the user id in the path.
pub async fn sign_in_as(
    session: super::session::SessionContext,
    path: actix_web::web::Path<i64>,
) -> Result<actix_web::HttpResponse, crate::domain::Error> {
    session.persist_user(crate::domain::UserId::new(path.into_inner()))?;
    let token = session.csrf_token()?;
    Ok(actix_web::HttpResponse::Ok().body(token))
}
