use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::app::config::SnapConfig;
use crate::error::{ErrorKind, SnapError, TransportError};
use crate::models::qr::{
    Money, QrMpmInput, QrMpmPayload, QrMpmRequest, QrMpmResponse, QrPayment, QrPaymentResult,
    TokenRequest, TokenResponse,
};
use crate::services::signer;
use crate::services::transport::{ReqwestTransport, SnapTransport, TransportResponse};
use crate::utils::money::{format_amount, CURRENCY_IDR};
use crate::utils::time::{render_validity_period, SnapTimestamp};

/// `200` / service `73` (B2B access token) / case `00`.
pub const TOKEN_SUCCESS_CODE: &str = "2007300";
/// `200` / service `47` (QR MPM generate) / case `00`.
pub const QR_MPM_SUCCESS_CODE: &str = "2004700";

const TOKEN_FALLBACK_MESSAGE: &str = "Unknown error";
const QR_MPM_FALLBACK_MESSAGE: &str = "Undefined error";
const QR_MPM_SUCCESS_MESSAGE: &str = "success";

/// A SNAP response code: HTTP status, two-digit service code, two-digit case code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCode {
    pub http_status: u16,
    pub service_code: String,
    pub case_code: String,
}

impl ResponseCode {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() != 7 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            http_status: raw[0..3].parse().ok()?,
            service_code: raw[3..5].to_string(),
            case_code: raw[5..7].to_string(),
        })
    }
}

/// Bearer token for exactly one resource call.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQr {
    pub message: String,
    pub payment: QrPayment,
}

impl From<Result<GeneratedQr, SnapError>> for QrPaymentResult {
    fn from(outcome: Result<GeneratedQr, SnapError>) -> Self {
        match outcome {
            Ok(generated) => QrPaymentResult::succeeded(generated.message, generated.payment),
            Err(e) => QrPaymentResult::failed(e.user_message()),
        }
    }
}

trait BankReply {
    fn response_code(&self) -> Option<&str>;
    fn response_message(&self) -> Option<&str>;
}

impl BankReply for TokenResponse {
    fn response_code(&self) -> Option<&str> {
        self.response_code.as_deref()
    }

    fn response_message(&self) -> Option<&str> {
        self.response_message.as_deref()
    }
}

impl BankReply for QrMpmResponse {
    fn response_code(&self) -> Option<&str> {
        self.response_code.as_deref()
    }

    fn response_message(&self) -> Option<&str> {
        self.response_message.as_deref()
    }
}

/// Decodes a bank reply and accepts it only when the HTTP status is below 400
/// and `responseCode` equals `expected`.
fn interpret<R>(response: &TransportResponse, expected: &str, fallback: &str) -> Result<R, SnapError>
where
    R: DeserializeOwned + BankReply,
{
    let reply: R = match serde_json::from_str(&response.body) {
        Ok(reply) => reply,
        Err(_) if response.status >= 400 => {
            return Err(SnapError::Protocol {
                code: None,
                message: fallback.to_string(),
            })
        }
        Err(e) => {
            return Err(SnapError::MalformedResponse(format!(
                "HTTP {}: {}",
                response.status, e
            )))
        }
    };

    if response.status < 400 && reply.response_code() == Some(expected) {
        return Ok(reply);
    }

    let code = reply.response_code().map(str::to_string);
    if let Some(parsed) = code.as_deref().and_then(ResponseCode::parse) {
        warn!(
            "SNAP rejected request: status={} service={} case={}",
            parsed.http_status, parsed.service_code, parsed.case_code
        );
    } else {
        warn!("SNAP rejected request: HTTP {} code={:?}", response.status, code);
    }

    Err(SnapError::Protocol {
        code,
        message: reply.response_message().unwrap_or(fallback).to_string(),
    })
}

pub struct SnapClient<T: SnapTransport> {
    config: SnapConfig,
    transport: T,
}

impl SnapClient<ReqwestTransport> {
    pub fn from_config(config: SnapConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.host.clone(), config.request_timeout())?;
        Ok(Self::new(config, transport))
    }
}

impl<T: SnapTransport> SnapClient<T> {
    pub fn new(config: SnapConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// Requests a B2B access token. No network call is made if signing fails.
    pub async fn create_bearer_token(&self, timestamp: &SnapTimestamp) -> Result<AccessToken, SnapError> {
        let credentials = &self.config.credentials;

        let signature =
            signer::asymmetric_signature(&credentials.client_id, timestamp, &credentials.private_key)
                .map_err(|e| {
                    error!("Asymmetric signature failed: {}", e);
                    e
                })?;

        let body = signer::canonical_body(&TokenRequest::client_credentials())?;
        let headers = [
            ("X-TIMESTAMP", timestamp.to_string()),
            ("X-CLIENT-KEY", credentials.client_id.clone()),
            ("X-SIGNATURE", signature),
        ];

        let response = self
            .transport
            .post_json(&self.config.token_path, &headers, body)
            .await
            .map_err(|e| {
                error!("Access token request failed: {}", e);
                SnapError::TokenTransport(e)
            })?;

        let reply: TokenResponse = interpret(&response, TOKEN_SUCCESS_CODE, TOKEN_FALLBACK_MESSAGE)?;
        match reply.access_token {
            Some(token) if !token.is_empty() => {
                debug!("Access token issued, expires_in={:?}", reply.expires_in);
                Ok(AccessToken(token))
            }
            _ => Err(SnapError::MalformedResponse(
                "token response has no accessToken".to_string(),
            )),
        }
    }

    /// Validates, then runs the token and QR MPM calls. Never panics on bank input.
    pub async fn create_qr_mpm(&self, input: &QrMpmInput) -> QrPaymentResult {
        self.try_create_qr_mpm(input).await.into()
    }

    pub async fn try_create_qr_mpm(&self, input: &QrMpmInput) -> Result<GeneratedQr, SnapError> {
        let request = input.validate().map_err(|violations| {
            warn!("Rejected QR MPM request: {}", violations.join("; "));
            SnapError::Validation(violations)
        })?;

        info!(
            "Creating QR MPM for {} amount={}",
            request.partner_reference_no, request.amount
        );

        let outcome = self.generate_qr_mpm(&request, &SnapTimestamp::now()).await;
        match &outcome {
            Ok(generated) => info!(
                "QR MPM created for {} reference={}",
                request.partner_reference_no, generated.payment.reference_no
            ),
            Err(e) if e.kind() == ErrorKind::Protocol => warn!(
                "QR MPM for {} rejected: {}",
                request.partner_reference_no, e
            ),
            Err(e) => error!("QR MPM for {} failed: {}", request.partner_reference_no, e),
        }
        outcome
    }

    /// One timestamp is used for the token call, the signature and both
    /// `X-TIMESTAMP` headers.
    pub async fn generate_qr_mpm(
        &self,
        request: &QrMpmRequest,
        timestamp: &SnapTimestamp,
    ) -> Result<GeneratedQr, SnapError> {
        let token = self.create_bearer_token(timestamp).await?;
        let credentials = &self.config.credentials;

        let body = signer::canonical_body(&self.build_payload(request))?;
        debug!("QR MPM payload: {}", body);

        let signature = signer::symmetric_signature(
            "POST",
            &self.config.qr_path,
            token.as_str(),
            &body,
            timestamp,
            &credentials.secret_key,
        );

        let headers = [
            ("X-TIMESTAMP", timestamp.to_string()),
            ("X-PARTNER-ID", credentials.partner_id.clone()),
            ("X-SIGNATURE", signature),
            ("X-EXTERNAL-ID", signer::create_external_id()),
            ("CHANNEL-ID", credentials.channel_id.clone()),
            ("Authorization", format!("Bearer {}", token.as_str())),
        ];

        let response = self
            .transport
            .post_json(&self.config.qr_path, &headers, body)
            .await?;

        let reply: QrMpmResponse = interpret(&response, QR_MPM_SUCCESS_CODE, QR_MPM_FALLBACK_MESSAGE)?;
        let (qr_content, reference_no) = match (reply.qr_content, reply.reference_no) {
            (Some(qr_content), Some(reference_no)) => (qr_content, reference_no),
            _ => {
                return Err(SnapError::MalformedResponse(
                    "QR MPM response missing qrContent or referenceNo".to_string(),
                ))
            }
        };

        Ok(GeneratedQr {
            message: reply
                .response_message
                .unwrap_or_else(|| QR_MPM_SUCCESS_MESSAGE.to_string()),
            payment: QrPayment {
                qr_content,
                reference_no,
                partner_reference_no: reply
                    .partner_reference_no
                    .unwrap_or_else(|| request.partner_reference_no.clone()),
            },
        })
    }

    fn build_payload(&self, request: &QrMpmRequest) -> QrMpmPayload {
        QrMpmPayload {
            merchant_id: self.config.credentials.merchant_id.clone(),
            partner_reference_no: request.partner_reference_no.clone(),
            amount: Money {
                value: format_amount(request.amount),
                currency: CURRENCY_IDR.to_string(),
            },
            validity_period: render_validity_period(&request.validity_period),
        }
    }
}
