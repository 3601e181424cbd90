//! In-process mock ledger endpoints for integration tests

#![allow(dead_code)]

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// How a mock endpoint answers `account_info`
#[derive(Debug, Clone)]
pub enum Behavior {
    Funded { drops: u64, owner_count: u64, flags: u32 },
    NotFound,
    ServerError,
    Garbage,
    Slow(Duration),
}

pub struct MockLedger {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl MockLedger {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

struct MockState {
    behavior: Behavior,
    hits: Arc<AtomicUsize>,
}

async fn account_info(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    assert_eq!(body["method"], "account_info");

    match &state.behavior {
        Behavior::Funded {
            drops,
            owner_count,
            flags,
        } => (
            StatusCode::OK,
            json!({
                "result": {
                    "status": "success",
                    "validated": true,
                    "account_data": {
                        "Account": body["params"][0]["account"],
                        "Balance": drops.to_string(),
                        "OwnerCount": owner_count,
                        "Flags": flags
                    }
                }
            })
            .to_string(),
        ),
        Behavior::NotFound => (
            StatusCode::OK,
            json!({"result": {"status": "error", "error": "actNotFound"}}).to_string(),
        ),
        Behavior::ServerError => (StatusCode::SERVICE_UNAVAILABLE, "overloaded".to_string()),
        Behavior::Garbage => (StatusCode::OK, "<html>not json</html>".to_string()),
        Behavior::Slow(delay) => {
            tokio::time::sleep(*delay).await;
            (StatusCode::OK, json!({"result": {"status": "error", "error": "actNotFound"}}).to_string())
        }
    }
}

/// Bind a mock endpoint on an ephemeral local port
pub async fn spawn_ledger(behavior: Behavior) -> MockLedger {
    let hits = Arc::new(AtomicUsize::new(0));
    let state = Arc::new(MockState {
        behavior,
        hits: hits.clone(),
    });
    let app = Router::new().route("/", post(account_info)).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockLedger {
        url: format!("http://{}/", addr),
        hits,
    }
}

/// A URL nothing listens on
pub async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}
