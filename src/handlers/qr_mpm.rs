use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::ErrorKind;
use crate::handlers::AppState;
use crate::models::qr::{QrMpmInput, QrPaymentResult};
use crate::services::SnapTransport;

/// `POST /qr-mpm`: 200 on success, 400 on any failure result, 500 if the
/// request task dies or the request could not be encoded.
pub async fn create_qr_mpm<T: SnapTransport + 'static>(
    State(state): State<AppState<T>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let input: QrMpmInput = match serde_json::from_slice(&body) {
        Ok(input) => input,
        Err(e) => {
            error!("Invalid QR MPM request body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "message": "Invalid JSON input"
                })),
            );
        }
    };

    state.metrics.increment_requests();

    let client = state.client.clone();
    let outcome = tokio::spawn(async move { client.try_create_qr_mpm(&input).await }).await;

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            error!("QR MPM task aborted: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Internal server error",
                    "error": e.to_string()
                })),
            );
        }
    };

    match &result {
        Ok(_) => state.metrics.increment_succeeded(),
        Err(e) => state.metrics.record_failure(e.kind()),
    }

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) if e.kind() == ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        Err(_) => StatusCode::BAD_REQUEST,
    };
    let result = QrPaymentResult::from(result);
    info!("QR MPM request finished with {}", status);

    let body = serde_json::to_value(&result).unwrap_or_else(|e| {
        json!({
            "success": false,
            "message": format!("failed to encode result: {}", e)
        })
    });
    (status, Json(body))
}
