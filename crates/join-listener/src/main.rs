//! Join-request manager for OneBot v11 bots.
//!
//! Listens for event posts, approves or rejects group join requests by
//! keyword and announces the outcome.
//!
//! Configuration is read from the environment (a `.env` file is honored);
//! see [`ListenerConfig`].

use std::sync::Arc;

use join_listener::{router, worker, AppState, ListenerConfig, EVENT_QUEUE_CAPACITY};
use join_manager::{JoinManager, JoinManagerConfig, PieChartRenderer, RecordStore};
use onebot_client::{OneBotClient, OneBotConfig, OneBotGateway};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,join_manager=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = ListenerConfig::from_env()?;
    init_tracing(config.log_json);

    info!("Starting join-listener v{}", env!("CARGO_PKG_VERSION"));

    let manager_config = JoinManagerConfig::load_or_init(&config.config_path)?;
    info!("Loaded configuration from {}", config.config_path.display());

    let records = Arc::new(RecordStore::open(config.records_path()));
    info!(
        "Loaded {} join records from {}",
        records.len().await,
        records.path().display()
    );

    let onebot = match &config.access_token {
        Some(token) => OneBotConfig::with_token(&config.onebot_api_url, token),
        None => OneBotConfig::new(&config.onebot_api_url),
    };
    let client = OneBotClient::connect(onebot).await?;
    let gateway = Arc::new(OneBotGateway::new(client));

    let renderer = PieChartRenderer::from_config(
        &manager_config,
        &config.assets_dir,
        config.chart_dir(),
    );
    let manager = Arc::new(
        JoinManager::from_config(&manager_config, records, gateway.clone(), gateway)
            .with_renderer(Arc::new(renderer)),
    );

    let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let worker = worker::spawn(manager.clone(), rx);

    let state = AppState::new(manager.clone(), tx, config.config_path.clone())
        .with_access_token(config.access_token.clone())
        .with_event_secret(config.event_secret.clone());
    let app = router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("Listening for OneBot events on http://{}/onebot", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router and its queue senders are gone; let the worker drain.
    match worker.await {
        Ok(handled) => info!("Handled {} events", handled),
        Err(e) => error!("Dispatch worker failed: {}", e),
    }

    if let Err(e) = manager.shutdown().await {
        error!("Failed to flush join records: {}", e);
        return Err(e.into());
    }

    info!("join-listener shut down");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
