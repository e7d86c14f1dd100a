// ── Resource operations ──
//
// `Provider` is the seam between a host (CLI, plugin shim) and the API:
// declared configuration and previous state in, new state out. Each
// resource kind adds its operations as inherent methods in its own file.

mod account;
mod address;
mod addresses;
mod data_source;

pub use account::{AccountConfig, AccountState};
pub use address::{AddressConfig, AddressState};
pub use addresses::{AddressesConfig, AddressesState, ImportId};

use portnox_api::PortnoxClient;

use crate::config::ProviderConfig;
use crate::error::CoreError;

/// Entry point for every resource operation.
///
/// Holds one `PortnoxClient`; safe to share across tasks reconciling
/// different accounts.
pub struct Provider {
    client: PortnoxClient,
}

impl Provider {
    pub fn new(config: &ProviderConfig) -> Result<Self, CoreError> {
        Ok(Self {
            client: config.build_client()?,
        })
    }

    pub fn from_client(client: PortnoxClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &PortnoxClient {
        &self.client
    }
}
