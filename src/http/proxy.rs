//! `/api/proxy` handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::http::request::{caller_user_agent, ProxyParams};
use crate::http::response::{html_response, CachePolicy};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::relay::RelayError;

/// `GET /api/proxy?url=...`: fetch a page on the caller's behalf.
pub async fn proxy_get(
    State(state): State<Arc<AppState>>,
    params: ProxyParams,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let result = relay_get(&state, &params, &headers).await;
    finish("GET", started, result)
}

/// `POST /api/proxy?url=...&referer=...`: submit a form on the caller's behalf.
pub async fn proxy_post(
    State(state): State<Arc<AppState>>,
    params: ProxyParams,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let result = relay_post(&state, &params, &headers, body).await;
    finish("POST", started, result)
}

async fn relay_get(
    state: &AppState,
    params: &ProxyParams,
    headers: &HeaderMap,
) -> Result<Response, RelayError> {
    let target_url = params.target_url()?;
    let page = state
        .forwarder
        .forward_get(target_url, caller_user_agent(headers))
        .await?;
    Ok(html_response(page, state.get_cache))
}

async fn relay_post(
    state: &AppState,
    params: &ProxyParams,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, RelayError> {
    let target_url = params.target_url()?;
    let page = state
        .forwarder
        .forward_post(
            target_url,
            params.referer_override(),
            body,
            caller_user_agent(headers),
        )
        .await?;
    Ok(html_response(page, CachePolicy::NoCache))
}

fn finish(method: &'static str, started: Instant, result: Result<Response, RelayError>) -> Response {
    let response = result.unwrap_or_else(IntoResponse::into_response);
    metrics::record_request(method, response.status().as_u16(), started);
    response
}
