//! HTTP inbound adapter serving the server-rendered value pages.

pub mod current_user;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod values;
pub mod views;

pub use error::ApiResult;

use actix_web::web;

/// Register the page and form routes.
///
/// Callers still provide `web::Data<HttpState>` and session middleware.
/// `/values/new` is registered ahead of `/values/{id}` so the literal path
/// wins.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use values_app::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(values::index)
        .service(values::list_values)
        .service(values::new_value)
        .service(values::create_value)
        .service(values::show_value)
        .service(values::edit_value)
        .service(values::update_value)
        .service(values::delete_value)
        .service(users::login_form)
        .service(users::login)
        .service(users::logout);
}
