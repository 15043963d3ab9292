use thiserror::Error;

/// Key loading or RSA signing failed. Never retried; no network call follows.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("failed to read private key: {0}")]
    KeyRead(#[from] std::io::Error),

    #[error("failed to parse private key: {0}")]
    KeyParse(String),

    #[error("signing operation failed: {0}")]
    Sign(String),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("invalid endpoint {0}")]
    InvalidUrl(String),
}

/// Failure categories a caller can observe. `Internal` is a fault in this
/// process, not in the caller's input or the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Signing,
    Transport,
    Protocol,
    Internal,
}

#[derive(Debug, Error)]
pub enum SnapError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("access token request failed: {0}")]
    TokenTransport(TransportError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("bank rejected request (code {code:?}): {message}")]
    Protocol {
        code: Option<String>,
        message: String,
    },

    #[error("malformed bank response: {0}")]
    MalformedResponse(String),

    #[error("failed to encode request body: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl SnapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SnapError::Validation(_) => ErrorKind::Validation,
            SnapError::Signing(_) => ErrorKind::Signing,
            SnapError::TokenTransport(_) | SnapError::Transport(_) => ErrorKind::Transport,
            SnapError::Protocol { .. } | SnapError::MalformedResponse(_) => ErrorKind::Protocol,
            SnapError::Encoding(_) => ErrorKind::Internal,
        }
    }

    /// Message handed back to the merchant caller. Transport details (bank
    /// host, path, reason) only go to the log.
    pub fn user_message(&self) -> String {
        match self {
            SnapError::Validation(violations) => violations.join("; "),
            SnapError::Signing(_) => "calling asymmetricSignature error".to_string(),
            SnapError::TokenTransport(_) => "calling generate token error".to_string(),
            SnapError::Transport(_) => "calling SNAP API error".to_string(),
            SnapError::Protocol { message, .. } => message.clone(),
            SnapError::MalformedResponse(_) => "invalid response from SNAP API".to_string(),
            SnapError::Encoding(_) => "Internal server error".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration value {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_violations() {
        let err = SnapError::Validation(vec!["first".into(), "second".into()]);
        assert_eq!(err.user_message(), "first; second");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_malformed_response_is_protocol_kind() {
        let err = SnapError::MalformedResponse("eof".into());
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn test_transport_messages_hide_bank_endpoint() {
        let timeout = || TransportError::Timeout {
            url: "https://api.bank.example/snap/v1.0/access-token/b2b".to_string(),
        };

        let token = SnapError::TokenTransport(timeout());
        assert_eq!(token.user_message(), "calling generate token error");
        assert_eq!(token.kind(), ErrorKind::Transport);

        let qr = SnapError::Transport(timeout());
        assert_eq!(qr.user_message(), "calling SNAP API error");
        assert!(!qr.user_message().contains("bank.example"));
    }

    #[test]
    fn test_signing_message() {
        let err = SnapError::Signing(SigningError::KeyParse("bad pem".into()));
        assert_eq!(err.user_message(), "calling asymmetricSignature error");
        assert_eq!(err.kind(), ErrorKind::Signing);
    }

    #[test]
    fn test_encoding_failure_is_internal() {
        let json_err = serde_json::from_str::<u8>("not json").unwrap_err();
        let err = SnapError::from(json_err);
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.user_message(), "Internal server error");
    }

    #[test]
    fn test_protocol_message_is_bank_message() {
        let err = SnapError::Protocol {
            code: Some("4004701".into()),
            message: "Invalid Field Format".into(),
        };
        assert_eq!(err.user_message(), "Invalid Field Format");
    }
}
