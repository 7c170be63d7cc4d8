//! Values web application library modules.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod services;
pub mod settings;

pub use middleware::Trace;
