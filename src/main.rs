use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use todo_service::auth::TokenVerifier;
use todo_service::config::AppConfig;
use todo_service::database::{DatabaseManager, MemoryTodoStore, PgTodoStore, TodoStore};
use todo_service::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "todo-service", version, about = "Per-user todo API")]
struct Args {
    /// Bind address (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Keep todos in process memory instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_service=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::from_env().context("failed to load configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    tracing::info!("Starting todo service in {:?} mode", config.environment);

    let (store, pool) = if args.in_memory {
        tracing::warn!("Using in-memory store; todos are lost on shutdown");
        (Arc::new(MemoryTodoStore::new()) as Arc<dyn TodoStore>, None)
    } else {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        (Arc::new(PgTodoStore::new(pool.clone())) as Arc<dyn TodoStore>, Some(pool))
    };

    let state = AppState::new(store, TokenVerifier::new(&config.security.jwt_secret));
    let router = app(state, &config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Todo service listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pool) = pool {
        DatabaseManager::close(pool).await;
    }
    tracing::info!("Todo service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
