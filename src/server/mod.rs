mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::centers::CenterDirectory;

pub fn build_router(directory: CenterDirectory) -> Router {
    let state = Arc::new(AppState { directory });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/nearest", get(handlers::nearest_center))
        .route("/api/centros", get(handlers::centers))
        .route("/api/cronograma", get(handlers::electoral_calendar))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, directory: CenterDirectory) -> std::io::Result<()> {
    let app = build_router(directory);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Comitia server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}
