use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

pub fn create_app(state: AppState, max_concurrency: usize) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route(
            "/api/news-impact",
            post(handlers::news_impact).layer(ConcurrencyLimitLayer::new(max_concurrency.max(1))),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Serves the app until `shutdown` resolves
pub async fn serve<F>(app: Router, addr: SocketAddr, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("News impact API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}

pub mod prelude {
    pub use ni_core::{AnalysisRequest, Error, ImpactReport, Result};
    pub use crate::{create_app, AppState};
}
