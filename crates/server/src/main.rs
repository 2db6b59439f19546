mod categories;
mod routes;
mod session;

use std::time::Duration;

use anyhow::Result;
use boutique_core::{AppConfig, LoadOptions, LogFormat};

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let state = routes::AppState::new(&config);
    let router = routes::router(state);

    let address = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        bind_address = %address,
        known_brands = config.catalog.known_brands.len(),
        "boutique-server listening"
    );

    let graceful = axum::serve(listener, router).with_graceful_shutdown(shutdown_signal());
    tokio::select! {
        result = graceful => result?,
        () = forced_shutdown(config.server.graceful_shutdown_secs) => {
            tracing::warn!(
                event_name = "system.server.forced_stop",
                "graceful shutdown window elapsed, stopping now"
            );
        }
    }

    tracing::info!(event_name = "system.server.stopped", "boutique-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!(event_name = "system.server.stopping", "shutdown signal received");
}

// Bounds how long draining connections can hold the process after a signal.
async fn forced_shutdown(grace_secs: u64) {
    let _ = tokio::signal::ctrl_c().await;
    tokio::time::sleep(Duration::from_secs(grace_secs)).await;
}
