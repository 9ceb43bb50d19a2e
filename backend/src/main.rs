use anyhow::Context;
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod error;
mod routes;

use config::Config;
use db::TaskDb;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("failed to read configuration")?;
    let db = TaskDb::open(&config.database_file);
    let app = routes::app(db, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(
        addr = %config.bind_addr,
        database = %config.database_file.display(),
        static_dir = %config.static_dir.display(),
        "task server listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
