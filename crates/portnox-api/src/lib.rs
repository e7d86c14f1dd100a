// portnox-api: Async Rust client for the Portnox Cloud MAC-based account API

pub mod accounts;
pub mod client;
pub mod error;
pub mod models;
pub mod normalize;
pub mod retry;
pub mod transport;

pub use client::{DEFAULT_BASE_URL, PortnoxClient, mask_secret};
pub use error::{ACCOUNT_NOT_FOUND_CODE, Error, RemoteError};
pub use retry::RetryPolicy;
pub use transport::{TlsMode, TransportConfig};
