//! Server-side HTML views.
//!
//! Handlers fill a [`ViewData`] and hand it to a [`Views`] implementation
//! together with the page to render. Every page extends `layout.html`, which
//! shows the optional alert and the navigation for the current user.

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use minijinja::Environment;
use serde::Serialize;

use crate::domain::{Error, User};

use super::ApiResult;

/// Pages the application can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewName {
    /// List of all values.
    ValuesIndex,
    /// A single value.
    ValuesShow,
    /// Form creating a value.
    ValuesNew,
    /// Form editing or deleting a value.
    ValuesEdit,
    /// Login form.
    Login,
}

impl ViewName {
    /// Template file backing the page.
    pub fn template(self) -> &'static str {
        match self {
            Self::ValuesIndex => "values/index.html",
            Self::ValuesShow => "values/show.html",
            Self::ValuesNew => "values/new.html",
            Self::ValuesEdit => "values/edit.html",
            Self::Login => "login.html",
        }
    }
}

/// Bootstrap-style alert colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Failure the user can act on.
    Danger,
    /// Completed action.
    Success,
}

/// Message shown above the page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Colour of the alert.
    pub level: AlertLevel,
    /// Text shown to the user.
    pub message: String,
}

/// Template context shared by every page.
#[derive(Debug, Clone, Serialize)]
pub struct ViewData {
    alert: Option<Alert>,
    user: Option<User>,
    csrf_token: String,
    #[serde(rename = "yield")]
    payload: minijinja::Value,
}

impl ViewData {
    /// Context for `user` with the session's CSRF token.
    pub fn new(user: Option<User>, csrf_token: impl Into<String>) -> Self {
        Self {
            alert: None,
            user,
            csrf_token: csrf_token.into(),
            payload: minijinja::context! {},
        }
    }

    /// Attach the page-specific payload exposed to templates as `yield`.
    #[must_use]
    pub fn with_yield<T: Serialize>(mut self, payload: &T) -> Self {
        self.payload = minijinja::Value::from_serialize(payload);
        self
    }

    /// Show `error` as a danger alert.
    ///
    /// Internal failures show the generic message instead of their detail.
    pub fn set_alert(&mut self, error: &Error) {
        self.alert = Some(Alert {
            level: AlertLevel::Danger,
            message: error.public_message().to_owned(),
        });
    }

    /// Show a success alert.
    pub fn set_success(&mut self, message: impl Into<String>) {
        self.alert = Some(Alert {
            level: AlertLevel::Success,
            message: message.into(),
        });
    }

    /// Alert currently attached, if any.
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }
}

/// Template rendering failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// A template failed to parse or render.
    #[error("failed to render {template}: {message}")]
    Template {
        /// Template name.
        template: &'static str,
        /// Engine diagnostic.
        message: String,
    },
}

/// Renders named views.
#[cfg_attr(test, mockall::automock)]
pub trait Views: Send + Sync {
    /// Render `view` with `data` into an HTML document.
    fn render(&self, view: ViewName, data: &ViewData) -> Result<String, ViewError>;
}

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../../templates/layout.html")),
    ("values/index.html", include_str!("../../../templates/values/index.html")),
    ("values/show.html", include_str!("../../../templates/values/show.html")),
    ("values/new.html", include_str!("../../../templates/values/new.html")),
    ("values/edit.html", include_str!("../../../templates/values/edit.html")),
    ("login.html", include_str!("../../../templates/login.html")),
];

/// [`Views`] backed by a `minijinja` environment with embedded templates.
///
/// HTML auto-escaping is on for every template.
pub struct MiniJinjaViews {
    env: Environment<'static>,
}

impl MiniJinjaViews {
    /// Load the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Template`] when a template fails to parse.
    pub fn new() -> Result<Self, ViewError> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|err| ViewError::Template {
                    template: name,
                    message: err.to_string(),
                })?;
        }
        Ok(Self { env })
    }
}

impl Views for MiniJinjaViews {
    fn render(&self, view: ViewName, data: &ViewData) -> Result<String, ViewError> {
        let template = view.template();
        self.env
            .get_template(template)
            .and_then(|tmpl| tmpl.render(data))
            .map_err(|err| ViewError::Template {
                template,
                message: err.to_string(),
            })
    }
}

/// Render `view` into a `200 OK` HTML response.
pub(crate) fn render_page(views: &dyn Views, view: ViewName, data: &ViewData) -> ApiResult<HttpResponse> {
    let body = views
        .render(view, data)
        .map_err(|err| Error::internal(err.to_string()))?;
    Ok(HttpResponse::Ok()
        .insert_header(ContentType::html())
        .body(body))
}
