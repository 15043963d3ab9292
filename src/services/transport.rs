use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::TransportError;

/// Raw bank reply; interpretation is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// POSTs a pre-serialized JSON body to a path on the SNAP host.
///
/// The body is sent exactly as given so that the bytes the bank hashes are
/// the bytes that were signed.
#[async_trait]
pub trait SnapTransport: Send + Sync {
    async fn post_json(
        &self,
        path: &str,
        headers: &[(&'static str, String)],
        body: String,
    ) -> Result<TransportResponse, TransportError>;
}

pub struct ReqwestTransport {
    client: Client,
    host: Url,
}

impl ReqwestTransport {
    pub fn new(host: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TransportError::Request {
                url: host.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, host })
    }

    /// Host and path are concatenated, so a host with a path prefix keeps it.
    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let raw = format!(
            "{}/{}",
            self.host.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| TransportError::InvalidUrl(format!("{}: {}", raw, e)))
    }
}

#[async_trait]
impl SnapTransport for ReqwestTransport {
    async fn post_json(
        &self,
        path: &str,
        headers: &[(&'static str, String)],
        body: String,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.endpoint(path)?;
        debug!("POST {} body={}", url, body);

        let mut request = self
            .client
            .post(url.clone())
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| classify(url.as_str(), e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| classify(url.as_str(), e))?;
        debug!("POST {} -> {}", url, status);

        Ok(TransportResponse { status, body })
    }
}

fn classify(url: &str, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout { url: url.to_string() }
    } else if err.is_connect() {
        TransportError::Connect {
            url: url.to_string(),
            reason: err.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}
