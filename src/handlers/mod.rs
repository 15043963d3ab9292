pub mod metrics;
pub mod qr_mpm;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::services::{AtomicMetrics, SnapClient, SnapTransport};

pub struct AppState<T: SnapTransport> {
    pub client: Arc<SnapClient<T>>,
    pub metrics: Arc<AtomicMetrics>,
}

impl<T: SnapTransport> AppState<T> {
    pub fn new(client: Arc<SnapClient<T>>) -> Self {
        Self {
            client,
            metrics: Arc::new(AtomicMetrics::new()),
        }
    }
}

impl<T: SnapTransport> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

pub fn router<T: SnapTransport + 'static>(state: AppState<T>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/qr-mpm", post(qr_mpm::create_qr_mpm::<T>))
        .route("/metrics", get(metrics::get_metrics::<T>))
        .with_state(state)
}

async fn health_handler() -> StatusCode {
    StatusCode::OK
}
