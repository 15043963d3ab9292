//! SNAP request signatures.
//!
//! Two schemes are used: an RSA/SHA-256 signature over `clientId|timestamp`
//! to obtain an access token, and an HMAC-SHA512 signature over the request
//! tuple for every resource call. Both are pure; the bank verifies them
//! byte-for-byte.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::Rng;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use serde::Serialize;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::path::PathBuf;

use crate::error::SigningError;
use crate::utils::time::{jakarta_offset, SnapTimestamp};

type HmacSha512 = Hmac<Sha512>;

const EXTERNAL_ID_RANDOM_DIGITS: usize = 18;

/// Where the RSA private key comes from.
#[derive(Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivateKeyMaterial {
    /// PEM file, read on every signing call.
    Path(PathBuf),
    /// Inline PEM.
    Pem(String),
}

impl fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivateKeyMaterial::Path(path) => f.debug_tuple("Path").field(path).finish(),
            PrivateKeyMaterial::Pem(_) => f.write_str("Pem(<redacted>)"),
        }
    }
}

/// Loads a PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1 (`BEGIN RSA PRIVATE KEY`) key.
pub fn load_private_key(material: &PrivateKeyMaterial) -> Result<RsaPrivateKey, SigningError> {
    let pem = match material {
        PrivateKeyMaterial::Path(path) => std::fs::read_to_string(path)?,
        PrivateKeyMaterial::Pem(pem) => pem.clone(),
    };

    RsaPrivateKey::from_pkcs8_pem(&pem).or_else(|pkcs8_err| {
        RsaPrivateKey::from_pkcs1_pem(&pem)
            .map_err(|pkcs1_err| SigningError::KeyParse(format!("pkcs8: {}; pkcs1: {}", pkcs8_err, pkcs1_err)))
    })
}

/// String signed for the token request.
pub fn asymmetric_string_to_sign(client_id: &str, timestamp: &SnapTimestamp) -> String {
    format!("{}|{}", client_id, timestamp)
}

/// RSA PKCS#1 v1.5 / SHA-256 over `clientId|timestamp`, base64 encoded.
pub fn asymmetric_signature(
    client_id: &str,
    timestamp: &SnapTimestamp,
    private_key: &PrivateKeyMaterial,
) -> Result<String, SigningError> {
    let key = load_private_key(private_key)?;
    let signing_key = SigningKey::<Sha256>::new(key);
    let signature = signing_key
        .try_sign(asymmetric_string_to_sign(client_id, timestamp).as_bytes())
        .map_err(|e| SigningError::Sign(e.to_string()))?;

    Ok(STANDARD.encode(signature.to_bytes()))
}

/// Minified JSON with unescaped slashes; these exact bytes are both signed
/// and transmitted.
pub fn canonical_body<T: Serialize>(body: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(body)
}

pub fn symmetric_string_to_sign(
    method: &str,
    relative_path: &str,
    token: &str,
    body: &str,
    timestamp: &SnapTimestamp,
) -> String {
    let body_digest = hex::encode(Sha256::digest(body.as_bytes()));
    format!(
        "{}:{}:{}:{}:{}",
        method, relative_path, token, body_digest, timestamp
    )
}

/// HMAC-SHA512 over `method:path:token:sha256hex(body):timestamp`, base64 encoded.
pub fn symmetric_signature(
    method: &str,
    relative_path: &str,
    token: &str,
    body: &str,
    timestamp: &SnapTimestamp,
    secret_key: &str,
) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(symmetric_string_to_sign(method, relative_path, token, body, timestamp).as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// `yyyymmdd` + unix seconds + 18 independent random digits. Trace id only.
pub fn create_external_id() -> String {
    let now = chrono::Utc::now();
    let date = now.with_timezone(&jakarta_offset()).format("%Y%m%d");

    let mut rng = rand::thread_rng();
    let random: String = (0..EXTERNAL_ID_RANDOM_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();

    format!("{}{}{}", date, now.timestamp(), random)
}
