//! In-process stand-in for the brokerage backend used by the integration suites.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use stimacasa::api::ApiClient;

/// Calls observed by the fake backend, in arrival order.
#[derive(Clone, Default)]
pub struct Recorder {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn push(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .expect("recorder mutex poisoned")
            .push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("recorder mutex poisoned").clone()
    }
}

/// Serve `router` on an ephemeral port and return the `/api` base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("fake backend runs");
    });
    format!("http://{addr}/api")
}

pub fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).expect("client builds")
}
