//! HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use values_app::inbound::http::session_config::SessionSettings;
use values_app::inbound::http::state::HttpState;

/// Everything [`super::create_server`] needs to start listening.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
    pub(crate) css_dir: PathBuf,
    pub(crate) js_dir: PathBuf,
}

impl ServerConfig {
    /// Combine session settings, listen address and handler state.
    ///
    /// Asset directories default to `assets/css` and `app/js`.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, http_state: HttpState) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            http_state,
            css_dir: PathBuf::from("assets/css"),
            js_dir: PathBuf::from("app/js"),
        }
    }

    /// Serve `/css` from `css_dir` and `/js` from `js_dir`.
    #[must_use]
    pub fn with_assets(mut self, css_dir: PathBuf, js_dir: PathBuf) -> Self {
        self.css_dir = css_dir;
        self.js_dir = js_dir;
        self
    }
}
