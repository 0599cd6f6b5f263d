//! `GET /search/shows` handler.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::state::AppState;
use crate::web::error::ApiError;
use crate::web::routes::cache;

/// The first `q` value of the query string; repeats are ignored.
fn first_q(params: &[(String, String)]) -> &str {
    params
        .iter()
        .find(|(name, _)| name == "q")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default()
}

/// `GET /search/shows?q={query}`
///
/// Responds with the upstream body verbatim and `X-Cache: HIT|MISS`.
pub(super) async fn search_shows(
    State(state): State<AppState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| {
        debug!(error = %e, "unreadable search query string");
        ApiError::bad_request("Missing query param: q")
    })?;
    let outcome = state.proxy.handle(first_q(&params)).await?;

    let mut response = outcome.body.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache::SEARCH),
    );
    headers.insert("x-cache", HeaderValue::from_static(outcome.cache.as_str()));
    Ok(response)
}
