// MAC-based account resource: create, read, delete.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use portnox_api::models::{CreateAccountRequest, NewAccount};

use super::Provider;
use crate::convert::add_entry;
use crate::error::CoreError;
use crate::model::{Account, DeclaredOrder, MacEntry};
use crate::outcome::{Diagnostic, ReadOutcome};
use crate::reconcile::reorder;
use crate::validate::{validate_account_name, validate_entries};

/// Declared configuration of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub account_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Inline whitelist sent at creation. Reported on read only when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_whitelist: Option<Vec<MacEntry>>,
}

/// Persisted state of an account. `id` is the account name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub id: String,
    #[serde(flatten)]
    pub account: Account,
}

impl Provider {
    pub async fn create_account(&self, config: &AccountConfig) -> Result<AccountState, CoreError> {
        validate_account_name(&config.account_name)?;
        if let Some(entries) = &config.mac_whitelist {
            validate_entries(entries)?;
        }

        let request = CreateAccountRequest {
            accounts: vec![NewAccount {
                account_name: config.account_name.clone(),
                description: config.description.clone().filter(|d| !d.is_empty()),
                group_id: config.group_id.clone(),
            }],
            mac_whitelist: config
                .mac_whitelist
                .as_ref()
                .map(|entries| entries.iter().map(add_entry).collect()),
        };
        self.client.create_account(&request).await?;

        debug!(account = %config.account_name, "account created");
        Ok(AccountState {
            id: config.account_name.clone(),
            account: Account {
                account_name: config.account_name.clone(),
                description: config.description.clone(),
                group_id: config.group_id.clone(),
                mac_whitelist: config.mac_whitelist.clone().unwrap_or_default(),
                ..Account::default()
            },
        })
    }

    /// Refresh an account by id.
    ///
    /// A remote "not found" (HTTP 404 or code 5357) is not an error: the
    /// outcome is [`ReadOutcome::Gone`] with a warning so the host clears
    /// the identity and recreates on the next apply.
    pub async fn read_account(
        &self,
        id: &str,
        declared: &AccountConfig,
    ) -> Result<ReadOutcome<AccountState>, CoreError> {
        let record = match self.client.get_account(id).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                warn!(id, error = %e, "account missing remotely, clearing state");
                return Ok(ReadOutcome::Gone(Diagnostic::resource_missing()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut account = Account::from_record(record, id);
        // An empty declared list counts as not declared.
        account.mac_whitelist = match declared.mac_whitelist.as_deref() {
            Some(entries) if !entries.is_empty() => {
                reorder(account.mac_whitelist, &DeclaredOrder::from_entries(entries))
            }
            _ => Vec::new(),
        };

        Ok(ReadOutcome::Found(AccountState {
            id: id.to_owned(),
            account,
        }))
    }

    /// Delete by id; the remote cascades the account's whitelist.
    pub async fn delete_account(&self, id: &str) -> Result<(), CoreError> {
        self.client.delete_account(id).await?;
        debug!(id, "account deleted");
        Ok(())
    }
}
