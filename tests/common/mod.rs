//! Shared utilities for integration tests.

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use page_relay::config::RelayConfig;
use page_relay::http::{HttpServer, PROXY_PATH};

/// Build the fully layered relay router with the given config.
pub fn relay_router(config: RelayConfig) -> Router {
    HttpServer::new(config).unwrap().router()
}

/// Build the relay router with default configuration.
pub fn default_router() -> Router {
    relay_router(RelayConfig::default())
}

/// `/api/proxy` with properly encoded query parameters.
pub fn proxy_uri(params: &[(&str, &str)]) -> String {
    let mut url = reqwest::Url::parse("http://relay.test").unwrap();
    url.set_path(PROXY_PATH);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    match url.query() {
        Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
        _ => url.path().to_string(),
    }
}

/// Response as seen by the caller.
#[allow(dead_code)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Drive one request through the router in-process.
pub async fn send(router: Router, request: Request<Body>) -> Reply {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    Reply {
        status,
        headers,
        body: String::from_utf8(body.to_vec()).unwrap(),
    }
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub fn closed_port_url(path: &str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}{path}")
}
