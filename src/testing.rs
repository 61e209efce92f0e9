//! In-process stand-in for the answer service, used by the async tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::routing::post;
use axum::Router;
use serde_json::Value;

#[derive(Default)]
struct Recorded {
    hits: AtomicUsize,
    last_body: Mutex<Option<Value>>,
}

/// Serves one canned response at `/chat/` and records what it receives.
pub struct MockService {
    pub url: String,
    recorded: Arc<Recorded>,
}

impl MockService {
    pub async fn spawn(status: u16, body: &'static str) -> Self {
        Self::spawn_with_delay(status, body, Duration::ZERO).await
    }

    pub async fn spawn_with_delay(status: u16, body: &'static str, delay: Duration) -> Self {
        let recorded = Arc::new(Recorded::default());
        let shared = Arc::clone(&recorded);
        let status = StatusCode::from_u16(status).expect("valid status code");

        let router = Router::new().route(
            "/chat/",
            post(move |request: String| {
                let shared = Arc::clone(&shared);
                async move {
                    shared.hits.fetch_add(1, Ordering::SeqCst);
                    {
                        let mut last = shared.last_body.lock().unwrap();
                        *last = serde_json::from_str(&request).ok();
                    }
                    tokio::time::sleep(delay).await;
                    (status, [(header::CONTENT_TYPE, "application/json")], body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock service");
        let addr = listener.local_addr().expect("mock service address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            url: format!("http://{addr}/chat/"),
            recorded,
        }
    }

    pub fn hits(&self) -> usize {
        self.recorded.hits.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Value> {
        self.recorded.last_body.lock().unwrap().clone()
    }
}

/// An endpoint on a port nobody is listening on, for connection-refused cases.
pub async fn unused_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}/chat/")
}
