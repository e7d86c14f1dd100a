// Read-only account lookup.

use super::Provider;
use crate::error::CoreError;
use crate::model::Account;

impl Provider {
    /// Fetch every attribute of an account. Any failure is fatal.
    pub async fn read_account_data(&self, id: &str) -> Result<Account, CoreError> {
        match self.client.get_account(id).await {
            Ok(record) => Ok(Account::from_record(record, id)),
            Err(e) if e.is_not_found() => Err(CoreError::AccountNotFound { name: id.to_owned() }),
            Err(e) => Err(e.into()),
        }
    }
}
