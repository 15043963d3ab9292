use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::time::parse_validity_period;

pub const PARTNER_REFERENCE_VIOLATION: &str =
    "partner_reference_no is required and must be a non-empty string";
pub const AMOUNT_VIOLATION: &str = "amount is required and must be a positive integer";
pub const VALIDITY_TYPE_VIOLATION: &str = "validity_period is required and must be a string";
pub const VALIDITY_FORMAT_VIOLATION: &str =
    "validity_period must be in 'yyyy-mm-dd hh:mm:ss' format";

/// Inbound request body as the merchant sent it. Fields stay untyped until
/// [`QrMpmInput::validate`] so every violation can be reported at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QrMpmInput {
    #[serde(default)]
    pub partner_reference_no: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub validity_period: Option<Value>,
}

impl QrMpmInput {
    pub fn new(partner_reference_no: &str, amount: i64, validity_period: &str) -> Self {
        Self {
            partner_reference_no: Some(Value::from(partner_reference_no)),
            amount: Some(Value::from(amount)),
            validity_period: Some(Value::from(validity_period)),
        }
    }

    pub fn validate(&self) -> Result<QrMpmRequest, Vec<String>> {
        let mut errors = Vec::new();

        let partner_reference_no = match self.partner_reference_no.as_ref().and_then(Value::as_str) {
            Some(value) if !value.trim().is_empty() => Some(value.to_string()),
            _ => {
                errors.push(PARTNER_REFERENCE_VIOLATION.to_string());
                None
            }
        };

        // `as_u64` is None for floats and negatives; zero is rejected below.
        let amount = match self.amount.as_ref().and_then(Value::as_u64) {
            Some(value) if value > 0 => Some(value),
            _ => {
                errors.push(AMOUNT_VIOLATION.to_string());
                None
            }
        };

        let validity_period = match self.validity_period.as_ref().and_then(Value::as_str) {
            None => {
                errors.push(VALIDITY_TYPE_VIOLATION.to_string());
                None
            }
            Some(raw) => {
                let parsed = parse_validity_period(raw);
                if parsed.is_none() {
                    errors.push(VALIDITY_FORMAT_VIOLATION.to_string());
                }
                parsed
            }
        };

        match (partner_reference_no, amount, validity_period) {
            (Some(partner_reference_no), Some(amount), Some(validity_period)) if errors.is_empty() => {
                Ok(QrMpmRequest {
                    partner_reference_no,
                    amount,
                    validity_period,
                })
            }
            _ => Err(errors),
        }
    }
}

/// A validated QR MPM request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMpmRequest {
    pub partner_reference_no: String,
    pub amount: u64,
    pub validity_period: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayment {
    pub qr_content: String,
    pub reference_no: String,
    pub partner_reference_no: String,
}

/// Outcome handed back to the endpoint. A failure never carries QR fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPaymentResult {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub payment: Option<QrPayment>,
}

impl QrPaymentResult {
    pub fn succeeded(message: impl Into<String>, payment: QrPayment) -> Self {
        Self {
            success: true,
            message: message.into(),
            payment: Some(payment),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payment: None,
        }
    }
}

// Wire types exchanged with the bank

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub grant_type: &'static str,
}

impl TokenRequest {
    pub fn client_credentials() -> Self {
        Self {
            grant_type: "client_credentials",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub response_code: Option<String>,
    pub response_message: Option<String>,
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Money {
    pub value: String,
    pub currency: String,
}

/// Field order is part of the signed byte string; do not reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrMpmPayload {
    pub merchant_id: String,
    pub partner_reference_no: String,
    pub amount: Money,
    pub validity_period: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrMpmResponse {
    pub response_code: Option<String>,
    pub response_message: Option<String>,
    pub qr_content: Option<String>,
    pub reference_no: Option<String>,
    pub partner_reference_no: Option<String>,
}
