// MAC whitelist collection resource
//
// Manages a set of entries on one account with the order-preserving
// reconciler. Identity is the account name.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use portnox_api::models::SearchRequest;

use super::Provider;
use crate::convert::add_entry;
use crate::error::CoreError;
use crate::model::{DeclaredOrder, MacEntry};
use crate::reconcile::{ReconcilePlan, remove_all, reorder};
use crate::validate::{validate_account_name, validate_entries};

/// Declared configuration of a whitelist collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressesConfig {
    pub account_name: String,
    #[serde(default)]
    pub mac_addresses: Vec<MacEntry>,
}

/// Persisted state of a whitelist collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressesState {
    pub id: String,
    pub account_name: String,
    #[serde(default)]
    pub mac_addresses: Vec<MacEntry>,
}

// ── Import id ────────────────────────────────────────────────────────

/// `account` or `account,mac1;mac2;...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    pub account_name: String,
    /// `None` imports every entry.
    pub filter: Option<Vec<String>>,
}

impl FromStr for ImportId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (account, filter) = match s.split_once(',') {
            Some((account, macs)) if !macs.is_empty() => {
                let macs: Vec<String> = macs
                    .split(';')
                    .map(str::trim)
                    .filter(|mac| !mac.is_empty())
                    .map(String::from)
                    .collect();
                (account, Some(macs))
            }
            Some((account, _)) => (account, None),
            None => (s, None),
        };
        validate_account_name(account)?;
        Ok(Self {
            account_name: account.to_owned(),
            filter,
        })
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filter {
            Some(macs) => write!(f, "{},{}", self.account_name, macs.join(";")),
            None => f.write_str(&self.account_name),
        }
    }
}

// ── Operations ───────────────────────────────────────────────────────

impl Provider {
    /// Add every declared entry in one batched call.
    pub async fn create_addresses(
        &self,
        config: &AddressesConfig,
    ) -> Result<AddressesState, CoreError> {
        validate_account_name(&config.account_name)?;
        validate_entries(&config.mac_addresses)?;

        let order = DeclaredOrder::from_entries(&config.mac_addresses);
        let plan = ReconcilePlan::diff(&[], &config.mac_addresses);
        plan.apply(&self.client, &config.account_name).await?;

        Ok(AddressesState {
            id: config.account_name.clone(),
            account_name: config.account_name.clone(),
            mac_addresses: reorder(plan.to_add_or_update, &order),
        })
    }

    /// Refresh tracked entries from the API.
    ///
    /// Only keys already in `state` or in `declared` are kept. The result
    /// follows the declared order (or the state's order when nothing is
    /// declared); other tracked keys are appended sorted by MAC then
    /// description.
    pub async fn read_addresses(
        &self,
        state: &AddressesState,
        declared: Option<&AddressesConfig>,
    ) -> Result<AddressesState, CoreError> {
        let account_name = state.account_name.as_str();
        let declared_entries = declared.map_or(&state.mac_addresses, |d| &d.mac_addresses);
        let order = DeclaredOrder::from_entries(declared_entries);

        let request = SearchRequest {
            account_name: Some(account_name.to_owned()),
            mac_whitelist: declared_entries.iter().map(add_entry).collect(),
        };
        let response = self.client.search_accounts(&request).await?;

        // Prefer the account whose name matches; otherwise the first result.
        let mut accounts = response.accounts;
        let position = accounts
            .iter()
            .position(|a| a.account_name.as_deref() == Some(account_name));
        let Some(account) = (match position {
            Some(i) => Some(accounts.swap_remove(i)),
            None => accounts.into_iter().next(),
        }) else {
            return Err(CoreError::NoAccountInSearch {
                name: account_name.to_owned(),
            });
        };

        let tracked: HashSet<&str> = state
            .mac_addresses
            .iter()
            .chain(declared_entries)
            .map(|e| e.mac_address.as_str())
            .collect();

        let remote: Vec<MacEntry> = account
            .agentless_options
            .unwrap_or_default()
            .mac_whitelist
            .into_iter()
            .map(MacEntry::from)
            .filter(|e| tracked.contains(e.mac_address.as_str()))
            .collect();

        debug!(
            account = account_name,
            tracked = tracked.len(),
            found = remote.len(),
            "refreshed whitelist"
        );

        Ok(AddressesState {
            id: state.id.clone(),
            account_name: account_name.to_owned(),
            mac_addresses: reorder(remote, &order),
        })
    }

    /// Move the remote whitelist from `previous` to `declared`.
    ///
    /// Removes are issued first, one per call, then a single batched
    /// add. An unchanged set issues no calls.
    pub async fn update_addresses(
        &self,
        previous: &AddressesState,
        declared: &AddressesConfig,
    ) -> Result<AddressesState, CoreError> {
        if declared.account_name != previous.account_name {
            return Err(CoreError::validation(format!(
                "account_name cannot change in place ({} -> {}); recreate the resource",
                previous.account_name, declared.account_name
            )));
        }
        validate_entries(&declared.mac_addresses)?;

        let order = DeclaredOrder::from_entries(&declared.mac_addresses);
        let plan = ReconcilePlan::diff(&previous.mac_addresses, &declared.mac_addresses);
        plan.apply(&self.client, &declared.account_name).await?;

        Ok(AddressesState {
            id: previous.id.clone(),
            account_name: declared.account_name.clone(),
            mac_addresses: reorder(plan.to_add_or_update, &order),
        })
    }

    /// Remove every tracked entry, one call per MAC.
    pub async fn delete_addresses(&self, state: &AddressesState) -> Result<(), CoreError> {
        remove_all(&self.client, &state.account_name, &state.mac_addresses).await?;
        info!(
            account = %state.account_name,
            removed = state.mac_addresses.len(),
            "whitelist collection deleted"
        );
        Ok(())
    }

    /// Adopt existing entries of an account, sorted by MAC address.
    pub async fn import_addresses(&self, id: &ImportId) -> Result<AddressesState, CoreError> {
        let record = self.client.get_account(&id.account_name).await?;
        let options = record
            .agentless_options
            .ok_or_else(|| CoreError::MissingAgentlessOptions {
                name: id.account_name.clone(),
            })?;

        let filter: Option<HashSet<&str>> = id
            .filter
            .as_ref()
            .map(|macs| macs.iter().map(String::as_str).collect());

        let mut entries: Vec<MacEntry> = options
            .mac_whitelist
            .into_iter()
            .map(MacEntry::from)
            .filter(|e| {
                filter
                    .as_ref()
                    .is_none_or(|macs| macs.contains(e.mac_address.as_str()))
            })
            .collect();

        if filter.is_some() && entries.is_empty() {
            return Err(CoreError::ImportFilterUnmatched {
                name: id.account_name.clone(),
            });
        }

        entries.sort_by(|a, b| a.mac_address.cmp(&b.mac_address));
        info!(account = %id.account_name, imported = entries.len(), "imported whitelist");

        Ok(AddressesState {
            id: id.account_name.clone(),
            account_name: id.account_name.clone(),
            mac_addresses: entries,
        })
    }
}
