//! Integration tests for the admin portal client.
//!
//! Each test starts an in-process mock of the admin API on a random local
//! port and points a real [`HttpAdminApi`] at it, so the full request and
//! response path runs without a network.
//!
//! ```bash
//! cargo test -p admin-portal-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::OriginalUri;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{MethodRouter, any};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use admin_portal::api::HttpAdminApi;

/// A request seen by the mock server. `path` is the full request path,
/// including the `/api/v2` prefix the routes are nested under.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl Captured {
    /// Request body parsed as JSON; `Null` when empty.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        if self.body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&self.body).unwrap()
        }
    }
}

/// Shared log of captured requests.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Captured>>>);

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn requests(&self) -> Vec<Captured> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, captured: Captured) {
        self.0.lock().unwrap().push(captured);
    }
}

/// Route that records the request and answers with `status` and a JSON body.
pub fn reply_json(
    recorder: &Recorder,
    status: StatusCode,
    body: serde_json::Value,
) -> MethodRouter {
    reply_raw(recorder, status, body.to_string())
}

/// Route that records the request and answers with `status` and a raw body.
pub fn reply_raw(
    recorder: &Recorder,
    status: StatusCode,
    body: impl Into<String>,
) -> MethodRouter {
    let recorder = recorder.clone();
    let body: String = body.into();

    any(
        move |method: Method,
              OriginalUri(uri): OriginalUri,
              headers: HeaderMap,
              request_body: String| {
            let recorder = recorder.clone();
            let body = body.clone();
            async move {
                recorder.push(Captured {
                    method,
                    path: uri.path().to_owned(),
                    authorization: headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_owned),
                    body: request_body,
                });
                (
                    status,
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
                    .into_response()
            }
        },
    )
}

/// A running mock API. The server stops when this is dropped.
pub struct MockServer {
    base_url: Url,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Serve `routes` under `/api/v2` on a random local port.
    pub async fn start(routes: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().nest("/api/v2", routes);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base_url = Url::parse(&format!("http://{addr}/api/v2/")).unwrap();
        Self { base_url, handle }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// HTTP client pointed at this server.
    #[must_use]
    pub fn api(&self) -> HttpAdminApi {
        HttpAdminApi::with_client(reqwest::Client::new(), self.base_url.clone())
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/api/v2/")).unwrap()
}
