#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use showsearch::state::AppState;
use showsearch::store::{CacheStore, MemoryStore, StoreError};
use showsearch::tvmaze::TvMazeApi;
use showsearch::web::proxy::SearchProxy;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;

/// An in-process stand-in for the TVMaze search endpoint.
///
/// `q=fail` answers 503; every other query returns a single show named after it.
#[derive(Clone, Default)]
pub struct FakeUpstream {
    hits: Arc<AtomicUsize>,
}

#[derive(Deserialize)]
struct Params {
    q: String,
}

impl FakeUpstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Bind to an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route("/search/shows", get(fake_search))
            .with_state(self.clone());
        serve(router).await
    }
}

async fn fake_search(
    State(upstream): State<FakeUpstream>,
    Query(params): Query<Params>,
) -> Response {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    // Long enough for concurrent requests to overlap.
    tokio::time::sleep(Duration::from_millis(50)).await;
    if params.q == "fail" {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    let id = params.q.len();
    let genres: Vec<&str> = if id % 2 == 0 { vec!["Drama"] } else { vec![] };
    let body = serde_json::json!([{
        "score": 0.9,
        "show": {
            "id": id,
            "name": params.q,
            "genres": genres,
            "premiered": "2012-04-15",
            "summary": "<p>A show.</p>",
            "image": null
        }
    }]);
    body.to_string().into_response()
}

pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A store whose every operation fails, standing in for an unreachable Redis.
pub struct BrokenStore;

#[async_trait]
impl CacheStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Connection("connection refused".to_owned()))
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), StoreError> {
        Err(StoreError::Connection("connection refused".to_owned()))
    }
}

pub fn app_state(upstream_base: &str, store: Arc<dyn CacheStore>, ttl: Duration) -> AppState {
    let api = TvMazeApi::new(upstream_base, 1000).unwrap();
    AppState::new(SearchProxy::new(store, Arc::new(api), ttl))
}

pub fn memory_state(upstream_base: &str) -> AppState {
    app_state(upstream_base, Arc::new(MemoryStore::new()), Duration::from_secs(10))
}
