pub mod atomic_metrics;
pub mod signer;
pub mod snap_client;
pub mod transport;

#[cfg(test)]
pub(crate) mod stub_transport;

pub use atomic_metrics::AtomicMetrics;
pub use snap_client::SnapClient;
pub use transport::{ReqwestTransport, SnapTransport};
