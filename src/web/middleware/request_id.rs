//! Per-request tracing span and request ID.
//!
//! Reuses an inbound `X-Request-Id` (set by a fronting load balancer) when it
//! is present and printable, otherwise generates a ULID. The resolved ID is
//! attached to the request as a [`RequestId`] extension and echoed back in the
//! `X-Request-Id` response header.

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::{Instrument, Level};

static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Longest inbound ID accepted verbatim.
const MAX_INBOUND_LEN: usize = 128;

/// The ID assigned to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    fn for_request(req: &Request) -> Self {
        let inbound = req
            .headers()
            .get(&REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|id| !id.is_empty() && id.len() <= MAX_INBOUND_LEN);
        match inbound {
            Some(id) => Self(id.to_owned()),
            None => Self(ulid::Ulid::new().to_string()),
        }
    }
}

/// 5xx at warn, 4xx at info, everything else at debug.
fn response_level(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::WARN
    } else if status.is_client_error() {
        Level::INFO
    } else {
        Level::DEBUG
    }
}

fn log_response(status: StatusCode, method: &str, path: &str, duration_ms: u64) {
    let level = response_level(status);
    let status = status.as_u16();
    if level == Level::WARN {
        tracing::warn!(method, path, status, duration_ms, "Response");
    } else if level == Level::INFO {
        tracing::info!(method, path, status, duration_ms, "Response");
    } else {
        tracing::debug!(method, path, status, duration_ms, "Response");
    }
}

#[derive(Clone)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request> for RequestIdService<S>
where
    S: Service<Request, Response = Response<B>> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Debug,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future =
        Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let id = RequestId::for_request(&req);
        let echoed = HeaderValue::from_str(&id.0).ok();
        let span = tracing::info_span!("request", req_id = %id.0);
        let method = req.method().to_string();
        let path = req.uri().path().to_owned();
        req.extensions_mut().insert(id);

        let start = Instant::now();
        let future = self.inner.call(req);

        Box::pin(
            async move {
                let mut result = future.await;
                let duration_ms = start.elapsed().as_millis() as u64;

                match &mut result {
                    Ok(response) => {
                        log_response(response.status(), &method, &path, duration_ms);
                        if let Some(value) = echoed {
                            response.headers_mut().insert(REQUEST_ID.clone(), value);
                        }
                    }
                    Err(e) => {
                        tracing::error!(method = %method, path = %path, error = ?e, duration_ms, "Request failed");
                    }
                }
                result
            }
            .instrument(span),
        )
    }
}
