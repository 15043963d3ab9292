pub mod app;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{ErrorKind, SnapError};
pub use models::qr::{QrMpmInput, QrPaymentResult};
pub use services::{ReqwestTransport, SnapClient, SnapTransport};
