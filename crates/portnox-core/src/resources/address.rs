// Single whitelist entry resource. Identity is `"{account}:{mac}"`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use portnox_api::models::{SearchRequest, WhitelistRequest};

use super::Provider;
use crate::convert::{add_entry, remove_exact};
use crate::error::CoreError;
use crate::model::MacEntry;
use crate::validate::{validate_account_name, validate_entry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressConfig {
    pub account_name: String,
    #[serde(flatten)]
    pub entry: MacEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressState {
    pub id: String,
    pub account_name: String,
    #[serde(flatten)]
    pub entry: MacEntry,
}

impl AddressState {
    fn from_config(config: &AddressConfig) -> Self {
        Self {
            id: format!("{}:{}", config.account_name, config.entry.mac_address),
            account_name: config.account_name.clone(),
            entry: config.entry.clone(),
        }
    }
}

impl Provider {
    pub async fn create_address(&self, config: &AddressConfig) -> Result<AddressState, CoreError> {
        validate_account_name(&config.account_name)?;
        validate_entry(&config.entry)?;

        let request = WhitelistRequest {
            account_name: config.account_name.clone(),
            mac_whitelist: vec![add_entry(&config.entry)],
        };
        self.client.add_mac_whitelist(&request).await?;

        let state = AddressState::from_config(config);
        debug!(id = %state.id, "address added");
        Ok(state)
    }

    /// Confirm the API answers a search for the entry, then echo the
    /// tracked values back as the new state.
    pub async fn read_address(&self, state: &AddressState) -> Result<AddressState, CoreError> {
        let request = SearchRequest {
            account_name: None,
            mac_whitelist: vec![add_entry(&state.entry)],
        };
        self.client.search_accounts(&request).await?;
        Ok(state.clone())
    }

    pub async fn delete_address(&self, state: &AddressState) -> Result<(), CoreError> {
        let request = WhitelistRequest {
            account_name: state.account_name.clone(),
            mac_whitelist: vec![remove_exact(&state.entry)],
        };
        self.client.remove_mac_whitelist(&request).await?;
        debug!(id = %state.id, "address removed");
        Ok(())
    }
}
