//! Recording transport for orchestration and handler tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use url::Url;

use crate::app::config::{Credentials, SnapConfig};
use crate::error::TransportError;
use crate::services::signer::PrivateKeyMaterial;
use crate::services::transport::{SnapTransport, TransportResponse};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl RecordedCall {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Replays queued responses in order; an empty queue is a transport error.
#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(TransportResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_raw(status, &body.to_string());
    }

    pub fn push_error(&self, err: TransportError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SnapTransport for StubTransport {
    async fn post_json(
        &self,
        path: &str,
        headers: &[(&'static str, String)],
        body: String,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            headers: headers.to_vec(),
            body,
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Request {
                    url: path.to_string(),
                    reason: "no stubbed response".to_string(),
                })
            })
    }
}

pub fn test_snap_config(private_key: PrivateKeyMaterial) -> SnapConfig {
    SnapConfig {
        host: Url::parse("https://api.bank.example").unwrap(),
        token_path: "/snap/v1.0/access-token/b2b".to_string(),
        qr_path: "/snap/v1.0/qr/qr-mpm-generate".to_string(),
        request_timeout_ms: 5_000,
        credentials: Credentials {
            client_id: "client-1".to_string(),
            secret_key: "s3cret".to_string(),
            partner_id: "partner-1".to_string(),
            channel_id: "95221".to_string(),
            merchant_id: "merchant-1".to_string(),
            private_key,
        },
    }
}
