#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use todo_service::auth::{Claims, TokenSigner, TokenVerifier};
use todo_service::config::AppConfig;
use todo_service::database::{MemoryTodoStore, TodoStore};
use todo_service::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    signer: TokenSigner,
}

impl TestServer {
    /// Bearer token for `user_id`, signed with the server's secret
    pub fn token_for(&self, user_id: i64) -> String {
        let claims = Claims::new(
            user_id,
            Some(format!("user{}", user_id)),
            Some("USER".to_string()),
            chrono::Duration::hours(1),
        );
        self.signer.sign(&claims).expect("failed to sign test token")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

fn test_config() -> Result<AppConfig> {
    AppConfig::from_source(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "API_ENABLE_REQUEST_LOGGING" => Some("false".to_string()),
        _ => None,
    })
    .context("failed to build test config")
}

/// Start the real router on a free port, backed by the given store.
/// The server lives as long as the calling test's runtime.
pub async fn spawn_server_with(store: Arc<dyn TodoStore>) -> Result<TestServer> {
    let config = test_config()?;

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let state = AppState::new(store, TokenVerifier::new(TEST_SECRET));
    let router = app(state, &config);
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let server = TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        signer: TokenSigner::new(TEST_SECRET),
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(Arc::new(MemoryTodoStore::new())).await
}
