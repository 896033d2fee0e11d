use std::sync::Arc;

use reqwest::Client;
use server::selector::{MoveSelector, RandomSelector};

/// A server instance bound to an ephemeral local port.
pub struct TestServer {
    base_url: String,
}

impl TestServer {
    /// Build a URL for an API endpoint.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Serve the app with the given selector in the current runtime.
pub async fn spawn_with(selector: Arc<dyn MoveSelector>) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, server::router(selector))
            .await
            .expect("Test server failed");
    });
    TestServer {
        base_url: format!("http://{addr}"),
    }
}

pub async fn spawn() -> TestServer {
    spawn_with(Arc::new(RandomSelector)).await
}

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}
