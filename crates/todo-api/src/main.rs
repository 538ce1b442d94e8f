//! todo-api バイナリのエントリポイント

use anyhow::Context;
use infrastructure::{DynamoDbClient, DynamoDbTodoStore, InMemoryTodoStore};
use shared::{init_tracing, Config, StoreBackend};
use todo_api::{app_with_state, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing().map_err(|e| anyhow::anyhow!(e))?;

    let config = Config::from_env().context("failed to load configuration")?;

    let router = match config.store_backend {
        StoreBackend::DynamoDb => {
            // クライアントは最初のリクエスト時に生成される
            let store = DynamoDbTodoStore::new(DynamoDbClient::new(&config));
            app_with_state(AppState::new(store))
        }
        StoreBackend::Memory => app_with_state(AppState::new(InMemoryTodoStore::new())),
    };

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        %addr,
        environment = %config.environment,
        backend = ?config.store_backend,
        table = %config.dynamodb_table,
        "server starting"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
