use anyhow::{Context, Result};
use blog_service::config::Config;
use blog_service::{telemetry, BlogServices};
use tracing::info;

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    telemetry::init_tracing(config.log.format);

    config
        .validate()
        .context("Configuration validation failed")?;
    info!(
        backend = ?config.store.backend,
        preview_enabled = config.preview.enabled,
        "Starting blog-service"
    );

    let _services = BlogServices::from_config(&config)
        .await
        .context("Failed to initialize services")?;
    info!("Post, comment and user services ready");

    shutdown_signal().await;
    info!("Shutdown signal received, stopping blog-service");
    Ok(())
}
