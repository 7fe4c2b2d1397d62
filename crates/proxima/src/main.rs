use proxima_client::{ClusterConfig, HttpClusterClient};
use proxima_scheduler::{Scheduler, SchedulerConfig};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing the proxima scheduler");

    // Credentials are loaded once at startup; the process is stateless
    // across restarts
    let config = ClusterConfig::from_env();
    info!("Using API server at {}", config.base_url);

    let client = Arc::new(HttpClusterClient::new(config));
    let scheduler = Scheduler::new(client, SchedulerConfig::default());

    let token = CancellationToken::new();

    let scheduler_token = token.clone();
    let scheduler_handle = tokio::spawn(async move {
        if let Err(e) = scheduler.run(scheduler_token).await {
            error!("Scheduler error: {}", e);
        }
    });

    info!("Watching for pod events");

    // Run until externally terminated
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| miette::miette!("Failed to listen for ctrl-c: {}", e))?;

    info!("Shutting down gracefully...");
    token.cancel();

    let shutdown_timeout = std::time::Duration::from_secs(5);
    let _ = tokio::time::timeout(shutdown_timeout, scheduler_handle).await;

    info!("Shutdown complete");

    Ok(())
}
