// MAC-based account endpoints
//
// Every call goes through `request_with_retry`, so rate-limited responses
// are retried uniformly regardless of verb or endpoint.

use reqwest::Method;
use tracing::debug;

use crate::client::PortnoxClient;
use crate::error::Error;
use crate::models::{AccountRecord, CreateAccountRequest, SearchRequest, SearchResponse, WhitelistRequest};
use crate::normalize::parse_json;

const ACCOUNTS: [&str; 2] = ["api", "mac-based-accounts"];

impl PortnoxClient {
    fn accounts_url(&self, tail: &[&str]) -> Result<url::Url, Error> {
        let segments: Vec<&str> = ACCOUNTS.iter().chain(tail).copied().collect();
        self.endpoint(&segments)
    }

    /// Create an account, optionally with an inline whitelist.
    ///
    /// `POST /api/mac-based-accounts`
    pub async fn create_account(&self, request: &CreateAccountRequest) -> Result<(), Error> {
        let url = self.accounts_url(&[])?;
        debug!(accounts = request.accounts.len(), "creating MAC-based account");
        self.request_with_retry(Method::POST, url, Some(request))
            .await?;
        Ok(())
    }

    /// Fetch one account by name or id.
    ///
    /// `GET /api/mac-based-accounts/{id}`
    pub async fn get_account(&self, id: &str) -> Result<AccountRecord, Error> {
        let url = self.accounts_url(&[id])?;
        debug!(id, "fetching MAC-based account");
        let body = self
            .request_with_retry::<()>(Method::GET, url, None)
            .await?;
        parse_json(&body)
    }

    /// Delete an account by name or id.
    ///
    /// `DELETE /api/mac-based-accounts/{id}`
    pub async fn delete_account(&self, id: &str) -> Result<(), Error> {
        let url = self.accounts_url(&[id])?;
        debug!(id, "deleting MAC-based account");
        self.request_with_retry::<()>(Method::DELETE, url, None)
            .await?;
        Ok(())
    }

    /// Upsert whitelist entries, keyed remotely by `Mac`.
    ///
    /// `POST /api/mac-based-accounts/mac-whitelist-add`
    pub async fn add_mac_whitelist(&self, request: &WhitelistRequest) -> Result<(), Error> {
        let url = self.accounts_url(&["mac-whitelist-add"])?;
        debug!(
            account = %request.account_name,
            entries = request.mac_whitelist.len(),
            "adding whitelist entries"
        );
        self.request_with_retry(Method::POST, url, Some(request))
            .await?;
        Ok(())
    }

    /// Remove whitelist entries, matched by `Mac` and any values supplied.
    ///
    /// `DELETE /api/mac-based-accounts/mac-whitelist-remove`
    pub async fn remove_mac_whitelist(&self, request: &WhitelistRequest) -> Result<(), Error> {
        let url = self.accounts_url(&["mac-whitelist-remove"])?;
        debug!(
            account = %request.account_name,
            entries = request.mac_whitelist.len(),
            "removing whitelist entries"
        );
        self.request_with_retry(Method::DELETE, url, Some(request))
            .await?;
        Ok(())
    }

    /// Query accounts by name and/or whitelist entries.
    ///
    /// `POST /api/mac-based-accounts/search`
    pub async fn search_accounts(&self, request: &SearchRequest) -> Result<SearchResponse, Error> {
        let url = self.accounts_url(&["search"])?;
        debug!(account = ?request.account_name, "searching accounts");
        let body = self
            .request_with_retry(Method::POST, url, Some(request))
            .await?;
        parse_json(&body)
    }
}
