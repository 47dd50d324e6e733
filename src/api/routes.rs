use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize;

    let mut router = Router::new()
        // Uploads
        .route(
            "/uploads",
            post(handlers::create_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/uploads/status", get(handlers::upload_status))
        // Store objects and the orphan journal
        .route("/objects", delete(handlers::delete_object))
        .route("/orphans", get(handlers::list_orphans))
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled; purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
