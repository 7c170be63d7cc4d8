//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only depend on domain ports,
//! so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, UserRepository, ValueRepository};

use super::views::Views;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Validated value storage.
    pub values: Arc<dyn ValueRepository>,
    /// User lookups for resolving the session identity.
    pub users: Arc<dyn UserRepository>,
    /// Credential checks for the login form.
    pub login: Arc<dyn LoginService>,
    /// Template renderer.
    pub views: Arc<dyn Views>,
}

impl HttpState {
    /// Bundle the ports handlers depend on.
    pub fn new(
        values: Arc<dyn ValueRepository>,
        users: Arc<dyn UserRepository>,
        login: Arc<dyn LoginService>,
        views: Arc<dyn Views>,
    ) -> Self {
        Self {
            values,
            users,
            login,
            views,
        }
    }
}
