//! End-to-end scenarios for the value pages on the in-memory store.
//!
//! The app is wired the way the server wires it: session middleware, trace
//! middleware, embedded templates and the argon2 login service. A small
//! cookie jar threads the session through successive requests.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use rstest::rstest;

use values_app::Trace;
use values_app::domain::TRACE_ID_HEADER;
use values_app::domain::ports::{PasswordVerifier, UserRepository, ValueRepository};
use values_app::inbound::http::configure;
use values_app::inbound::http::views::MiniJinjaViews;
use values_app::outbound::password::Argon2PasswordVerifier;
use values_app::services::{Services, with_in_memory_store, with_users, with_values};

const ADMIN_EMAIL: &str = "admin@example.com";
const READER_EMAIL: &str = "reader@example.com";
const PASSWORD: &str = "correct horse battery staple";

struct Harness {
    services: Services,
    key: Key,
}

impl Harness {
    async fn new() -> Self {
        let services = Services::new(vec![with_in_memory_store(), with_values(), with_users()])
            .expect("in-memory services build");
        services
            .ensure_admin(ADMIN_EMAIL, PASSWORD)
            .await
            .expect("admin stored");
        services
            .users()
            .upsert(READER_EMAIL, &password_hash(), false)
            .await
            .expect("reader stored");
        Self {
            services,
            key: Key::generate(),
        }
    }

    fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let views = MiniJinjaViews::new().expect("templates parse");
        let state = self.services.http_state(Arc::new(views));
        let session = SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(web::scope("").wrap(session).configure(configure))
    }
}

fn password_hash() -> String {
    Argon2PasswordVerifier::default()
        .hash(PASSWORD)
        .expect("argon2 hashing succeeds")
}

#[derive(Default)]
struct Browser {
    cookie: Option<Cookie<'static>>,
}

impl Browser {
    async fn send<S, B>(&mut self, app: &S, request: test::TestRequest) -> ServiceResponse<B>
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let res = test::call_service(app, request.to_request()).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
        {
            self.cookie = Some(cookie.into_owned()).filter(|cookie| !cookie.value().is_empty());
        }
        res
    }

    async fn page<S, B>(&mut self, app: &S, uri: &str) -> (StatusCode, String)
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let res = self.send(app, test::TestRequest::get().uri(uri)).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, String::from_utf8(body.to_vec()).expect("utf-8 body"))
    }

    async fn csrf_token<S, B>(&mut self, app: &S) -> String
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let (_, html) = self.page(app, "/login").await;
        extract_csrf_token(&html)
    }

    async fn log_in<S, B>(&mut self, app: &S, email: &str)
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let token = self.csrf_token(app).await;
        let res = self
            .send(
                app,
                test::TestRequest::post().uri("/login").set_form([
                    ("email", email),
                    ("password", PASSWORD),
                    ("csrf_token", token.as_str()),
                ]),
            )
            .await;
        assert_eq!(res.status(), StatusCode::FOUND, "login should redirect");
    }

    async fn post_form<S, B>(
        &mut self,
        app: &S,
        uri: &str,
        fields: &[(&str, &str)],
    ) -> ServiceResponse<B>
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let token = self.csrf_token(app).await;
        let mut form: Vec<(&str, &str)> = fields.to_vec();
        form.push(("csrf_token", token.as_str()));
        self.send(app, test::TestRequest::post().uri(uri).set_form(form))
            .await
    }
}

fn extract_csrf_token(html: &str) -> String {
    const MARKER: &str = "name=\"csrf_token\" value=\"";
    let start = html.find(MARKER).expect("page embeds a CSRF token") + MARKER.len();
    let len = html[start..].find('"').expect("token attribute terminates");
    html[start..start + len].to_owned()
}

fn location<B>(res: &ServiceResponse<B>) -> Option<String> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[actix_web::test]
async fn admin_creates_value_and_lands_on_edit_form() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let mut browser = Browser::default();
    browser.log_in(&app, ADMIN_EMAIL).await;

    let res = browser
        .post_form(&app, "/values", &[("name", "Honesty")])
        .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let target = location(&res).expect("redirect target");
    assert!(target.starts_with("/values/") && target.ends_with("/update"), "{target}");

    let (status, html) = browser.page(&app, &target).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Honesty"));

    let (_, list) = browser.page(&app, "/values").await;
    assert!(list.contains("Honesty"));
}

#[actix_web::test]
async fn reader_cannot_create_values() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let mut browser = Browser::default();
    browser.log_in(&app, READER_EMAIL).await;

    let res = browser
        .post_form(&app, "/values", &[("name", "Honesty")])
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let values = harness.services.values().get_all().await.expect("listing");
    assert!(values.is_empty());
}

#[actix_web::test]
async fn anonymous_visitors_are_forbidden_from_the_new_form() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let mut browser = Browser::default();

    let (status, _) = browser.page(&app, "/values/new").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn blank_name_shows_alert_and_stores_nothing() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let mut browser = Browser::default();
    browser.log_in(&app, ADMIN_EMAIL).await;

    let res = browser.post_form(&app, "/values", &[("name", "")]).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    let html = std::str::from_utf8(&body).expect("utf-8");
    assert!(html.contains("alert-danger"));
    assert!(html.contains("name is required"));

    let values = harness.services.values().get_all().await.expect("listing");
    assert!(values.is_empty());
}

#[actix_web::test]
async fn update_then_delete_round_trip() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let mut browser = Browser::default();
    browser.log_in(&app, ADMIN_EMAIL).await;

    let res = browser
        .post_form(&app, "/values", &[("name", "Honesty")])
        .await;
    let edit_path = location(&res).expect("redirect target");
    let value_path = edit_path.trim_end_matches("/update").to_owned();

    let res = browser
        .post_form(&app, &edit_path, &[("name", "Integrity")])
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    let html = std::str::from_utf8(&body).expect("utf-8");
    assert!(html.contains("Value updated successfully!"));
    assert!(html.contains("Integrity"));

    let res = browser
        .post_form(&app, &format!("{value_path}/delete"), &[])
        .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res).as_deref(), Some("/values"));

    let (status, _) = browser.page(&app, &value_path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/values/abc", StatusCode::BAD_REQUEST)]
#[case("/values/12345", StatusCode::NOT_FOUND)]
#[case("/values/0", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn detail_page_statuses(#[case] uri: &str, #[case] expected: StatusCode) {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let mut browser = Browser::default();

    let res = browser.send(&app, test::TestRequest::get().uri(uri)).await;
    assert_eq!(res.status(), expected);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
}

#[actix_web::test]
async fn forged_csrf_token_is_rejected() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let mut browser = Browser::default();
    browser.log_in(&app, ADMIN_EMAIL).await;

    let res = browser
        .send(
            &app,
            test::TestRequest::post()
                .uri("/values")
                .set_form([("name", "Honesty"), ("csrf_token", "forged")]),
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn wrong_password_rerenders_login_form() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let mut browser = Browser::default();
    let token = browser.csrf_token(&app).await;

    let res = browser
        .send(
            &app,
            test::TestRequest::post().uri("/login").set_form([
                ("email", ADMIN_EMAIL),
                ("password", "wrong"),
                ("csrf_token", token.as_str()),
            ]),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    let html = std::str::from_utf8(&body).expect("utf-8");
    assert!(html.contains("invalid credentials"));
    assert!(html.contains(ADMIN_EMAIL));
}

#[actix_web::test]
async fn logout_returns_to_anonymous() {
    let harness = Harness::new().await;
    let app = test::init_service(harness.app()).await;
    let mut browser = Browser::default();
    browser.log_in(&app, ADMIN_EMAIL).await;

    let (_, html) = browser.page(&app, "/values").await;
    assert!(html.contains("Log out"));

    let res = browser.post_form(&app, "/logout", &[]).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res).as_deref(), Some("/"));

    let (status, html) = browser.page(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Log in"));
}
