//! Global service construction.
//!
//! [`Services::new`] applies an ordered list of configuration steps to a
//! [`ServicesBuilder`]. Storage is chosen first, then the value and user
//! services are built on top of it:
//!
//! ```
//! use values_app::services::{Services, with_in_memory_store, with_users, with_values};
//!
//! let services = Services::new(vec![
//!     with_in_memory_store(),
//!     with_values(),
//!     with_users(),
//! ])
//! .expect("services build");
//! # let _ = services;
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::ports::{
    LoginService, PasswordVerifier, UserRepository, ValueRepository,
};
use crate::domain::{User, UserLoginService, ValuesService};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::Views;
use crate::outbound::memory::{InMemoryUserRepository, InMemoryValueRepository};
use crate::outbound::password::Argon2PasswordVerifier;
use crate::outbound::persistence::{DbPool, DieselUserRepository, DieselValueRepository};

/// Errors raised while assembling services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServicesError {
    /// A service step ran before any storage step.
    #[error("no storage configured; add a pool or in-memory store step first")]
    MissingStorage,
    /// `build` found a service that no step configured.
    #[error("service {service} was not configured")]
    MissingService {
        /// Name of the missing service.
        service: &'static str,
    },
    /// The bootstrap admin could not be stored.
    #[error("failed to bootstrap admin user: {message}")]
    Bootstrap {
        /// Underlying failure.
        message: String,
    },
}

/// One configuration step.
pub type ServicesConfig = Box<dyn FnOnce(&mut ServicesBuilder) -> Result<(), ServicesError> + Send>;

enum Storage {
    Postgres(DbPool),
    InMemory {
        values: Arc<InMemoryValueRepository>,
        users: Arc<InMemoryUserRepository>,
    },
}

/// Mutable state threaded through configuration steps.
#[derive(Default)]
pub struct ServicesBuilder {
    storage: Option<Storage>,
    values: Option<Arc<dyn ValueRepository>>,
    users: Option<Arc<dyn UserRepository>>,
    login: Option<Arc<dyn LoginService>>,
    hasher: Option<Arc<dyn PasswordVerifier>>,
}

impl ServicesBuilder {
    fn storage(&self) -> Result<&Storage, ServicesError> {
        self.storage.as_ref().ok_or(ServicesError::MissingStorage)
    }

    fn build(self) -> Result<Services, ServicesError> {
        let values = self
            .values
            .ok_or(ServicesError::MissingService { service: "values" })?;
        let users = self
            .users
            .ok_or(ServicesError::MissingService { service: "users" })?;
        let login = self
            .login
            .ok_or(ServicesError::MissingService { service: "login" })?;
        let hasher = self
            .hasher
            .ok_or(ServicesError::MissingService { service: "password hasher" })?;
        Ok(Services {
            values,
            users,
            login,
            hasher,
        })
    }
}

/// Use PostgreSQL storage through `pool`.
pub fn with_pool(pool: DbPool) -> ServicesConfig {
    Box::new(move |builder: &mut ServicesBuilder| {
        debug!(database_url = %redact_url(pool.database_url()), "using PostgreSQL storage");
        builder.storage = Some(Storage::Postgres(pool));
        Ok(())
    })
}

/// Use process-local storage; contents are lost on exit.
pub fn with_in_memory_store() -> ServicesConfig {
    Box::new(|builder: &mut ServicesBuilder| {
        debug!("using in-memory storage");
        builder.storage = Some(Storage::InMemory {
            values: Arc::new(InMemoryValueRepository::default()),
            users: Arc::new(InMemoryUserRepository::default()),
        });
        Ok(())
    })
}

/// Build the validated [`ValuesService`] on the configured storage.
pub fn with_values() -> ServicesConfig {
    Box::new(|builder: &mut ServicesBuilder| {
        let storage: Arc<dyn ValueRepository> = match builder.storage()? {
            Storage::Postgres(pool) => Arc::new(DieselValueRepository::new(pool.clone())),
            Storage::InMemory { values, .. } => values.clone(),
        };
        builder.values = Some(Arc::new(ValuesService::new(storage)));
        Ok(())
    })
}

/// Build the user repository and the argon2-backed login service.
pub fn with_users() -> ServicesConfig {
    Box::new(|builder: &mut ServicesBuilder| {
        let users: Arc<dyn UserRepository> = match builder.storage()? {
            Storage::Postgres(pool) => Arc::new(DieselUserRepository::new(pool.clone())),
            Storage::InMemory { users, .. } => users.clone(),
        };
        let verifier = Arc::new(Argon2PasswordVerifier::default());
        builder.login = Some(Arc::new(UserLoginService::new(users.clone(), verifier.clone())));
        builder.hasher = Some(verifier);
        builder.users = Some(users);
        Ok(())
    })
}

/// Assembled application services.
#[derive(Clone)]
pub struct Services {
    values: Arc<dyn ValueRepository>,
    users: Arc<dyn UserRepository>,
    login: Arc<dyn LoginService>,
    hasher: Arc<dyn PasswordVerifier>,
}

impl Services {
    /// Apply `steps` in order.
    ///
    /// # Errors
    ///
    /// Returns the first step's error, or [`ServicesError::MissingService`]
    /// when the steps left a service unconfigured.
    pub fn new(steps: Vec<ServicesConfig>) -> Result<Self, ServicesError> {
        let mut builder = ServicesBuilder::default();
        for step in steps {
            step(&mut builder)?;
        }
        builder.build()
    }

    /// Validated value service.
    pub fn values(&self) -> Arc<dyn ValueRepository> {
        self.values.clone()
    }

    /// User lookups.
    pub fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    /// Credential checks.
    pub fn login(&self) -> Arc<dyn LoginService> {
        self.login.clone()
    }

    /// Create or refresh an admin account with `password`.
    ///
    /// # Errors
    ///
    /// Returns [`ServicesError::Bootstrap`] when hashing or storage fails.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<User, ServicesError> {
        let email = email.trim().to_lowercase();
        let hash = self
            .hasher
            .hash(password)
            .map_err(|err| ServicesError::Bootstrap {
                message: err.to_string(),
            })?;
        let user = self
            .users
            .upsert(&email, &hash, true)
            .await
            .map_err(|err| ServicesError::Bootstrap {
                message: err.to_string(),
            })?;
        info!(user_id = %user.id(), "admin account ready");
        Ok(user)
    }

    /// Handler state rendering through `views`.
    pub fn http_state(&self, views: Arc<dyn Views>) -> HttpState {
        HttpState::new(self.values(), self.users(), self.login(), views)
    }
}

/// Strip credentials from a connection URL before logging it.
fn redact_url(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => match rest.rsplit_once('@') {
            Some((_, host)) => format!("{scheme}://***@{host}"),
            None => url.to_owned(),
        },
        None => url.to_owned(),
    }
}
