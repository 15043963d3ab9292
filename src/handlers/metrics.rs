use axum::{extract::State, response::Json};

use crate::handlers::AppState;
use crate::services::atomic_metrics::MetricsSnapshot;
use crate::services::SnapTransport;

pub async fn get_metrics<T: SnapTransport + 'static>(
    State(state): State<AppState<T>>,
) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
