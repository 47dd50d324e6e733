//! Shared test helpers for doc-uploader in-crate tests.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::{BackendConfig, Config, NodeConfig, StoreConfig};
use crate::coordinator::UploadCoordinator;
use crate::gateway::HttpGateway;
use crate::journal::OrphanJournal;
use crate::registry::HttpRegistry;
use crate::AppState;

pub const TEST_BUCKET: &str = "team-docs";

/// Create a test AppState with a temporary journal, talking to `backend_url`.
pub fn test_state(temp_dir: &tempfile::TempDir, backend_url: &str) -> Arc<AppState> {
    let data_dir = temp_dir.path().join("data");

    let config = Config {
        backend: BackendConfig {
            base_url: backend_url.to_string(),
            token: Some("test-token".to_string()),
            ..Default::default()
        },
        node: NodeConfig {
            bind_address: "127.0.0.1:0".to_string(),
            data_dir: data_dir.to_string_lossy().to_string(),
        },
        store: StoreConfig {
            bucket: TEST_BUCKET.to_string(),
        },
        test_mode: true,
        max_upload_size: 1024 * 1024, // 1MB for tests
    };

    let journal = OrphanJournal::open(&data_dir).expect("Failed to open test journal");
    let backend = BackendClient::new(reqwest::Client::new(), &config.backend);
    let coordinator = UploadCoordinator::new(
        TEST_BUCKET,
        Arc::new(HttpGateway::new(backend.clone())),
        Arc::new(HttpRegistry::new(
            backend,
            config.backend.documents_path.clone(),
        )),
    )
    .with_journal(journal.clone());

    Arc::new(AppState {
        config,
        coordinator,
        journal,
    })
}

/// Serve the router on an ephemeral port and return its base URL.
pub async fn spawn_app(state: Arc<AppState>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    let app = crate::api::create_router(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://{addr}")
}
