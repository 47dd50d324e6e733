use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doc_uploader::{
    api,
    backend::BackendClient,
    config::Config,
    coordinator::UploadCoordinator,
    gateway::HttpGateway,
    journal::OrphanJournal,
    registry::HttpRegistry,
    AppState,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    match log_format.to_lowercase().as_str() {
        "gcp" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_stackdriver::layer())
                .init();
        }
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_list(false),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    info!(version = env!("CARGO_PKG_VERSION"), "doc-uploader starting");

    let config = Config::load()?;
    info!(
        backend = %config.backend.base_url,
        bucket = %config.store.bucket,
        "Loaded configuration"
    );

    let journal = OrphanJournal::open(&config.node.data_dir)?;
    info!("Orphan journal opened at: {}", config.node.data_dir);

    let pending = journal.list_orphans()?.len();
    if pending > 0 {
        tracing::warn!(orphans = pending, "Journal holds objects without document records");
    }

    // One client for the backend and the store; reqwest's default timeouts apply
    let client = reqwest::Client::builder().build()?;
    let backend = BackendClient::new(client, &config.backend);

    let coordinator = UploadCoordinator::new(
        config.store.bucket.clone(),
        Arc::new(HttpGateway::new(backend.clone())),
        Arc::new(HttpRegistry::new(
            backend,
            config.backend.documents_path.clone(),
        )),
    )
    .with_journal(journal.clone());

    let state = Arc::new(AppState {
        config: config.clone(),
        coordinator,
        journal,
    });

    let app = api::create_router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(&config.node.bind_address).await?;
    info!("Listening on: {}", config.node.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight uploads");
}
