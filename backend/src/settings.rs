//! Application configuration loaded via OrthoConfig.
//!
//! Every field can come from the command line or a `VALUES_*` environment
//! variable. Without a database URL the server runs on the in-memory store.

use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:6789";
const DEFAULT_ASSETS_DIR: &str = "assets";
const DEFAULT_APP_JS_DIR: &str = "app/js";
const DEFAULT_POOL_SIZE: u32 = 10;

/// Server, storage and bootstrap settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "VALUES")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply pending migrations at startup.
    #[ortho_config(default = false)]
    pub auto_migrate: bool,
    /// Revert every migration and re-apply them at startup. Destroys data.
    #[ortho_config(default = false)]
    pub destructive_reset: bool,
    /// Directory holding the `css` assets.
    pub assets_dir: Option<PathBuf>,
    /// Directory holding the compiled `js` bundle.
    pub app_js_dir: Option<PathBuf>,
    /// E-mail of an admin account created or refreshed at startup.
    pub admin_email: Option<String>,
    /// Password for the bootstrap admin.
    pub admin_password: Option<String>,
}

impl AppSettings {
    /// Configured bind address, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured address is malformed.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Configured pool size, falling back to the default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// Directory served under `/css`.
    pub fn css_dir(&self) -> PathBuf {
        self.assets_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_ASSETS_DIR))
            .join("css")
    }

    /// Directory served under `/js`.
    pub fn js_dir(&self) -> PathBuf {
        self.app_js_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_APP_JS_DIR))
    }

    /// Bootstrap admin credentials when both halves are configured.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (self.admin_email.as_deref(), self.admin_password.as_deref()) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        }
    }
}
