use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use lvl_catalog::{Catalog, CatalogError, CatalogResult};
use lvl_types::IdError;
use tracing::{debug, error};

use crate::router::AppState;
use crate::wire;

pub const GREETING: &str = "<p>hello! this is the levelhub backend, home of community-made levels</p>\n\
<p>browse <a href='/list'>/list</a> to see everything published so far</p>";

/// Failure of a request handler.
#[derive(Debug)]
pub enum ApiError {
    Catalog(CatalogError),
    /// The blocking task running the catalog call panicked or was cancelled.
    Task(tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Catalog(e) => {
                if e.is_client_error() {
                    debug!(error = %e, "request rejected");
                } else {
                    error!(error = %e, "catalog operation failed");
                }
                wire::error_response(&e).into_response()
            }
            ApiError::Task(e) => {
                error!(error = %e, "catalog task did not complete");
                (axum::http::StatusCode::INTERNAL_SERVER_ERROR, wire::INTERNAL).into_response()
            }
        }
    }
}

/// Run a catalog call on the blocking pool; it does synchronous file I/O.
async fn run_blocking<T, F>(catalog: &Catalog, f: F) -> Result<T, ApiError>
where
    F: FnOnce(Catalog) -> CatalogResult<T> + Send + 'static,
    T: Send + 'static,
{
    let catalog = catalog.clone();
    tokio::task::spawn_blocking(move || f(catalog))
        .await
        .map_err(ApiError::Task)?
        .map_err(ApiError::Catalog)
}

/// The `{id}` path segment, percent-decoded.
///
/// A segment that does not decode to UTF-8 holds characters no level id may
/// contain, so it is answered like any other invalid id.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!(%rejection, "undecodable level id");
            Err(ApiError::Catalog(CatalogError::InvalidId(
                IdError::InvalidCharacter {
                    ch: char::REPLACEMENT_CHARACTER,
                },
            )))
        }
    }
}

/// GET /
pub async fn home_handler() -> Html<&'static str> {
    Html(GREETING)
}

/// GET /list
pub async fn list_handler(State(state): State<AppState>) -> Result<String, ApiError> {
    let entries = run_blocking(&state.catalog, |catalog| catalog.list()).await?;
    Ok(wire::listing(&entries))
}

/// GET /get/{id}
pub async fn get_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = path_id(path)?;
    let content = run_blocking(&state.catalog, move |catalog| catalog.fetch(&id)).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content).into_response())
}

/// GET|POST /upload/{id}, level content in the `data` header.
pub async fn upload_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> Result<&'static str, ApiError> {
    let id = path_id(path)?;
    let data = level_data(&headers);
    run_blocking(&state.catalog, move |catalog| catalog.upload(&id, data.as_deref())).await?;
    Ok(wire::OK)
}

/// The `data` header as text. A value that is not UTF-8 counts as absent.
fn level_data(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(wire::DATA_HEADER)?;
    match std::str::from_utf8(value.as_bytes()) {
        Ok(text) => Some(text.to_owned()),
        Err(_) => {
            debug!("ignoring non UTF-8 data header");
            None
        }
    }
}
