//! HRMS server: runs the service role named by `HRMS_SERVICE`
//! (employee, attendance, payroll, user, gateway, or all).
//!
//! Run from repo root: `cargo run -p hrms-server`
//! Configuration comes from the environment and an optional `.env` file.

use hrms::{build_app, load_from_env};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hrms=info,hrms_server=info,tower_http=info")),
        )
        .init();

    let config = load_from_env()?;
    tracing::info!(service = config.service.as_str(), store = store_kind(&config.store), "starting");
    let app = build_app(&config).await?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("{} listening on http://{}", config.service.as_str(), listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn store_kind(store: &hrms::StoreConfig) -> &'static str {
    match store {
        hrms::StoreConfig::Postgres { .. } => "postgres",
        hrms::StoreConfig::Memory => "memory",
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
