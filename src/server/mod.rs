//! HTTP server for Gram Atlas.
//!
//! One route: GET /api/locations. The store is loaded before the
//! listener binds and shared read-only across request tasks.

mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::dataset::LocationStore;

pub fn build_router(store: LocationStore) -> Router {
    let state = Arc::new(AppState { store });

    Router::new()
        .route("/api/locations", get(handlers::locations))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, store: LocationStore) {
    let state_count = store.state_count();
    let app = build_router(store);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Cannot bind to {}: {}", addr, e);
            std::process::exit(1);
        });

    eprintln!("  Gram Atlas server listening on http://{}", addr);
    eprintln!("  Dataset: {} states loaded.", state_count);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    });
}
