//! Value controllers.
//!
//! ```text
//! GET  /values               list
//! GET  /values/new           new form (admin)
//! POST /values               create (admin)
//! GET  /values/{id}          detail
//! GET  /values/{id}/update   edit form (admin)
//! POST /values/{id}/update   update (admin)
//! POST /values/{id}/delete   soft delete (admin)
//! ```
//!
//! Validation failures re-render the form with a danger alert; everything
//! else maps to exactly one status through [`Error`].

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::ValueRepositoryError;
use crate::domain::{Error, Value, ValueId};

use super::ApiResult;
use super::current_user::CurrentUser;
use super::session::SessionContext;
use super::state::HttpState;
use super::views::{ViewData, ViewName, render_page};

/// Route name of the value list.
pub const VALUES_INDEX_ROUTE: &str = "values_index";
/// Route name of the value detail page.
pub const VALUE_SHOW_ROUTE: &str = "value_show";
/// Route name of the edit form.
pub const EDIT_VALUE_ROUTE: &str = "edit_value";

const CREATE_FORBIDDEN: &str = "You do not have permission to create a value";
const EDIT_FORBIDDEN: &str = "You do not have permission to edit this value";
const UPDATED_MESSAGE: &str = "Value updated successfully!";

/// Form body for creating or renaming a value.
#[derive(Debug, Deserialize)]
pub struct ValueForm {
    /// Submitted name; missing fields read as empty.
    #[serde(default)]
    pub name: String,
    /// CSRF token from the hidden field.
    #[serde(default)]
    pub csrf_token: String,
}

/// Form body carrying only the CSRF token.
#[derive(Debug, Deserialize)]
pub struct CsrfForm {
    /// CSRF token from the hidden field.
    #[serde(default)]
    pub csrf_token: String,
}

fn parse_value_id(raw: &str) -> ApiResult<ValueId> {
    raw.parse::<ValueId>().map_err(|err| {
        info!(raw, error = %err, "malformed value id");
        Error::invalid_request("Invalid value ID")
    })
}

fn map_value_error(error: ValueRepositoryError) -> Error {
    match error {
        ValueRepositoryError::NotFound { .. } => Error::not_found("Value not found"),
        ValueRepositoryError::Invalid { reason } => Error::invalid_request(reason.to_string()),
        ValueRepositoryError::Connection { message } | ValueRepositoryError::Query { message } => {
            Error::internal(message)
        }
    }
}

/// Split validation failures, which become form alerts, from hard errors.
fn validation_or_fail(error: ValueRepositoryError) -> ApiResult<Error> {
    match error {
        ValueRepositoryError::Invalid { .. } => Ok(map_value_error(error)),
        other => Err(map_value_error(other)),
    }
}

async fn value_by_id(state: &HttpState, raw_id: &str) -> ApiResult<Value> {
    let id = parse_value_id(raw_id)?;
    state.values.get(id).await.map_err(map_value_error)
}

fn page_data(user: CurrentUser, session: &SessionContext) -> ApiResult<ViewData> {
    Ok(ViewData::new(user.into_inner(), session.csrf_token()?))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

/// Redirect to a named route, falling back to `fallback` when the route
/// cannot be generated.
fn redirect_to_route(req: &HttpRequest, name: &str, elements: &[String], fallback: &str) -> HttpResponse {
    match req.url_for(name, elements) {
        Ok(url) => redirect(url.path()),
        Err(error) => {
            warn!(route = name, %error, "URL generation failed; using fallback");
            redirect(fallback)
        }
    }
}

async fn render_index(state: &HttpState, user: CurrentUser, session: &SessionContext) -> ApiResult<HttpResponse> {
    let values = state.values.get_all().await.map_err(map_value_error)?;
    let data = page_data(user, session)?.with_yield(&json!({ "values": values }));
    render_page(state.views.as_ref(), ViewName::ValuesIndex, &data)
}

/// Landing page; same content as the value list.
#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    user: CurrentUser,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    render_index(&state, user, &session).await
}

/// List every live value.
#[get("/values", name = "values_index")]
pub async fn list_values(
    state: web::Data<HttpState>,
    user: CurrentUser,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    render_index(&state, user, &session).await
}

/// Blank creation form.
#[get("/values/new")]
pub async fn new_value(
    state: web::Data<HttpState>,
    user: CurrentUser,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    user.require_admin(CREATE_FORBIDDEN)?;
    let data = page_data(user, &session)?.with_yield(&json!({ "value": { "name": "" } }));
    render_page(state.views.as_ref(), ViewName::ValuesNew, &data)
}

/// Create a value and redirect to its edit form.
#[post("/values")]
pub async fn create_value(
    req: HttpRequest,
    state: web::Data<HttpState>,
    user: CurrentUser,
    session: SessionContext,
    form: web::Form<ValueForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    session.verify_csrf(&form.csrf_token)?;
    user.require_admin(CREATE_FORBIDDEN)?;

    let mut value = Value::new(form.name);
    match state.values.create(&mut value).await {
        Ok(()) => {
            info!(value_id = %value.id(), "value created");
            let id = value.id().to_string();
            Ok(redirect_to_route(
                &req,
                EDIT_VALUE_ROUTE,
                &[id.clone()],
                &format!("/values/{id}/update"),
            ))
        }
        Err(error) => {
            let alert = validation_or_fail(error)?;
            let mut data = page_data(user, &session)?.with_yield(&json!({ "value": value }));
            data.set_alert(&alert);
            render_page(state.views.as_ref(), ViewName::ValuesNew, &data)
        }
    }
}

/// Detail page of one value.
#[get("/values/{id}", name = "value_show")]
pub async fn show_value(
    state: web::Data<HttpState>,
    user: CurrentUser,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let value = value_by_id(&state, &path).await?;
    let data = page_data(user, &session)?.with_yield(&json!({ "value": value }));
    render_page(state.views.as_ref(), ViewName::ValuesShow, &data)
}

/// Edit form of one value.
#[get("/values/{id}/update", name = "edit_value")]
pub async fn edit_value(
    state: web::Data<HttpState>,
    user: CurrentUser,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let value = value_by_id(&state, &path).await?;
    user.require_admin(EDIT_FORBIDDEN)?;
    let data = page_data(user, &session)?.with_yield(&json!({ "value": value }));
    render_page(state.views.as_ref(), ViewName::ValuesEdit, &data)
}

/// Rename a value and re-render the edit form with the outcome.
#[post("/values/{id}/update")]
pub async fn update_value(
    state: web::Data<HttpState>,
    user: CurrentUser,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<ValueForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    session.verify_csrf(&form.csrf_token)?;
    let mut value = value_by_id(&state, &path).await?;
    user.require_admin(EDIT_FORBIDDEN)?;

    value.set_name(form.name);
    let outcome = state.values.update(&mut value).await;
    let mut data = page_data(user, &session)?;
    match outcome {
        Ok(()) => {
            info!(value_id = %value.id(), "value updated");
            data.set_success(UPDATED_MESSAGE);
        }
        Err(error) => data.set_alert(&validation_or_fail(error)?),
    }
    let data = data.with_yield(&json!({ "value": value }));
    render_page(state.views.as_ref(), ViewName::ValuesEdit, &data)
}

/// Soft-delete a value and redirect to the list.
#[post("/values/{id}/delete")]
pub async fn delete_value(
    req: HttpRequest,
    state: web::Data<HttpState>,
    user: CurrentUser,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<CsrfForm>,
) -> ApiResult<HttpResponse> {
    session.verify_csrf(&form.csrf_token)?;
    let value = value_by_id(&state, &path).await?;
    user.require_admin(EDIT_FORBIDDEN)?;

    match state.values.delete(value.id()).await {
        Ok(()) => {
            info!(value_id = %value.id(), "value deleted");
            Ok(redirect_to_route(&req, VALUES_INDEX_ROUTE, &[], "/values"))
        }
        Err(error) => {
            let alert = validation_or_fail(error)?;
            let mut data = page_data(user, &session)?.with_yield(&json!({ "value": value }));
            data.set_alert(&alert);
            render_page(state.views.as_ref(), ViewName::ValuesEdit, &data)
        }
    }
}
