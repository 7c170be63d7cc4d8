//! Login and logout handlers.
//!
//! ```text
//! GET  /login    login form
//! POST /login    email + password, redirects to /values on success
//! POST /logout   clears the session, redirects to /
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::domain::{Error, ErrorCode, LoginCredentials, LoginValidationError};

use super::ApiResult;
use super::current_user::CurrentUser;
use super::session::SessionContext;
use super::state::HttpState;
use super::values::CsrfForm;
use super::views::{ViewData, ViewName, render_page};

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Submitted e-mail address.
    #[serde(default)]
    pub email: String,
    /// Submitted password.
    #[serde(default)]
    pub password: String,
    /// CSRF token from the hidden field.
    #[serde(default)]
    pub csrf_token: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

fn login_page(
    state: &HttpState,
    user: CurrentUser,
    session: &SessionContext,
    email: &str,
    alert: Option<&Error>,
) -> ApiResult<HttpResponse> {
    let mut data = ViewData::new(user.into_inner(), session.csrf_token()?)
        .with_yield(&json!({ "email": email }));
    if let Some(error) = alert {
        data.set_alert(error);
    }
    render_page(state.views.as_ref(), ViewName::Login, &data)
}

fn redirect(location: &'static str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Render the login form.
#[get("/login")]
pub async fn login_form(
    state: web::Data<HttpState>,
    user: CurrentUser,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    login_page(&state, user, &session, "", None)
}

/// Authenticate and establish a session.
///
/// Blank fields and rejected credentials re-render the form with an alert.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    user: CurrentUser,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    session.verify_csrf(&form.csrf_token)?;

    let credentials = match LoginCredentials::try_from_parts(&form.email, &form.password) {
        Ok(credentials) => credentials,
        Err(err) => {
            let error = map_login_validation_error(err);
            return login_page(&state, user, &session, &form.email, Some(&error));
        }
    };

    match state.login.authenticate(&credentials).await {
        Ok(authenticated) => {
            session.persist_user(authenticated.id())?;
            info!(user_id = %authenticated.id(), "user signed in");
            Ok(redirect("/values"))
        }
        Err(err) if err.code() == ErrorCode::Unauthorized => {
            login_page(&state, user, &session, &form.email, Some(&err))
        }
        Err(err) => Err(err),
    }
}

/// Drop the session and return to the landing page.
#[post("/logout")]
pub async fn logout(session: SessionContext, form: web::Form<CsrfForm>) -> ApiResult<HttpResponse> {
    session.verify_csrf(&form.csrf_token)?;
    session.purge();
    Ok(redirect("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockLoginService, MockUserRepository, MockValueRepository};
    use crate::domain::{User, UserId};
    use crate::inbound::http::test_utils::{issue_csrf_token, session_cookie, test_session_middleware};
    use crate::inbound::http::views::MiniJinjaViews;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use std::sync::Arc;

    fn http_state(login_service: MockLoginService) -> HttpState {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(User::new(id, "ada@example.com", "hash", true))));
        HttpState::new(
            Arc::new(MockValueRepository::new()),
            Arc::new(users),
            Arc::new(login_service),
            Arc::new(MiniJinjaViews::new().expect("templates parse")),
        )
    }

    macro_rules! test_app {
        ($login:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(http_state($login)))
                    .wrap(test_session_middleware())
                    .route("/csrf", web::get().to(issue_csrf_token))
                    .service(login_form)
                    .service(login)
                    .service(logout),
            )
            .await
        };
    }

    async fn csrf<S, B>(app: &S) -> (Cookie<'static>, String)
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse<B>,
                Error = actix_web::Error,
            >,
        B: actix_web::body::MessageBody,
    {
        let res = test::call_service(app, test::TestRequest::get().uri("/csrf").to_request()).await;
        let cookie = session_cookie(&res).expect("session cookie");
        let body = test::read_body(res).await;
        (cookie, String::from_utf8(body.to_vec()).expect("utf-8 token"))
    }

    #[actix_web::test]
    async fn successful_login_redirects_to_values() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_authenticate()
            .withf(|creds| creds.email() == "ada@example.com" && creds.password() == "secret")
            .times(1)
            .returning(|_| Ok(User::new(UserId::new(1), "ada@example.com", "hash", true)));
        let app = test_app!(login_service);
        let (cookie, token) = csrf(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .cookie(cookie)
                .set_form([("email", "Ada@Example.com"), ("password", "secret"), ("csrf_token", token.as_str())])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/values")
        );
        assert!(session_cookie(&res).is_some());
    }

    #[actix_web::test]
    async fn rejected_credentials_rerender_form_with_alert() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_authenticate()
            .returning(|_| Err(Error::unauthorized("invalid credentials")));
        let app = test_app!(login_service);
        let (cookie, token) = csrf(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .cookie(cookie)
                .set_form([("email", "ada@example.com"), ("password", "nope"), ("csrf_token", token.as_str())])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        let html = std::str::from_utf8(&body).expect("utf-8");
        assert!(html.contains("invalid credentials"));
    }

    #[rstest]
    #[case("", "pw", "email must not be empty")]
    #[case("ada@example.com", "", "password must not be empty")]
    #[actix_web::test]
    async fn blank_fields_never_reach_the_login_service(
        #[case] email: &str,
        #[case] password: &str,
        #[case] message: &str,
    ) {
        let mut login_service = MockLoginService::new();
        login_service.expect_authenticate().never();
        let app = test_app!(login_service);
        let (cookie, token) = csrf(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .cookie(cookie)
                .set_form([("email", email), ("password", password), ("csrf_token", token.as_str())])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert!(std::str::from_utf8(&body).expect("utf-8").contains(message));
    }

    #[actix_web::test]
    async fn login_without_csrf_token_is_forbidden() {
        let mut login_service = MockLoginService::new();
        login_service.expect_authenticate().never();
        let app = test_app!(login_service);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_form([("email", "ada@example.com"), ("password", "secret")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn logout_purges_and_redirects_home() {
        let app = test_app!(MockLoginService::new());
        let (cookie, token) = csrf(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/logout")
                .cookie(cookie)
                .set_form([("csrf_token", token.as_str())])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/")
        );
        let cookie = session_cookie(&res).expect("removal cookie");
        assert_eq!(cookie.value(), "");
    }
}
