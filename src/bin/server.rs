use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use taxi_service::config::{get_config, CliArgs};
use taxi_service::{create_app, db, repo, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::fs::metadata(".env").is_ok() {
        dotenv::dotenv().ok();
    }

    let args = CliArgs::parse();

    // Held until shutdown so buffered log lines reach the file
    let _log_guard = telemetry::init_tracing(args.debug, args.log_json, args.log_dir.as_deref())?;

    let config = get_config(&args)?;

    let pool = db::init_pool(&config.database_url)
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    db::run_migrations(&pool)?;

    let purged = repo::purge_expired_sessions(&pool)?;
    info!("Removed {} expired sessions", purged);

    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(Arc::new(pool), config)?;
    let app = create_app(state);

    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!("Listening on http://{}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
