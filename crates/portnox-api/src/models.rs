// Portnox API request and response types
//
// Field names follow the API's PascalCase convention. Response types use
// `#[serde(default)]` and lenient field decoding throughout because the
// API is inconsistent about field presence and shape across versions; a
// single odd field must not abort a whole read.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize;

// ── Requests ─────────────────────────────────────────────────────────

/// One entry of a `MacWhiteList` request array.
///
/// Removal requests match by `Mac`, optionally narrowed by the previous
/// `Description` / `Expiration`, so both are optional here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacWhitelistEntry {
    #[serde(rename = "Mac")]
    pub mac: String,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Expiration", skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

impl MacWhitelistEntry {
    /// An entry that matches on the MAC address alone.
    pub fn by_mac(mac: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            description: None,
            expiration: None,
        }
    }
}

/// Body of `mac-whitelist-add` and `mac-whitelist-remove`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhitelistRequest {
    #[serde(rename = "AccountName")]
    pub account_name: String,
    #[serde(rename = "MacWhiteList")]
    pub mac_whitelist: Vec<MacWhitelistEntry>,
}

/// Account descriptor inside a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    #[serde(rename = "AccountName")]
    pub account_name: String,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "GroupId", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// Body of `POST /api/mac-based-accounts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAccountRequest {
    #[serde(rename = "MacBasedAccounts")]
    pub accounts: Vec<NewAccount>,
    #[serde(rename = "MacWhiteList", skip_serializing_if = "Option::is_none")]
    pub mac_whitelist: Option<Vec<MacWhitelistEntry>>,
}

/// Body of `POST /api/mac-based-accounts/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    #[serde(rename = "AccountName", skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(rename = "MacWhiteList")]
    pub mac_whitelist: Vec<MacWhitelistEntry>,
}

// ── Responses ────────────────────────────────────────────────────────

/// A normalized whitelist entry as read back from the API.
///
/// `description` is `""` when the API omits it or sends `null`.
/// `expiration` is `None` when absent, `null`, or an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacWhitelistItem {
    pub mac: String,
    pub description: String,
    pub expiration: Option<String>,
}

/// A vendor and its MAC prefixes (`AgentlessOptions.VendorsWhiteList`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorItem {
    pub vendor_name: String,
    pub vendor_prefixes: Vec<String>,
}

/// `AgentlessOptions.SecureMabOptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SecureMabOptions {
    #[serde(rename = "Action", default, deserialize_with = "lenient_int")]
    pub action: Option<i64>,
    #[serde(rename = "Enabled", default, deserialize_with = "lenient")]
    pub enabled: Option<bool>,
}

/// `AgentlessOptions` block of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgentlessOptions {
    #[serde(
        rename = "MacWhiteList",
        default,
        deserialize_with = "normalize::deserialize_mac_whitelist"
    )]
    pub mac_whitelist: Vec<MacWhitelistItem>,
    #[serde(
        rename = "VendorsWhiteList",
        default,
        deserialize_with = "normalize::deserialize_vendors"
    )]
    pub vendors_whitelist: Vec<VendorItem>,
    #[serde(rename = "SecureMabOptions", default, deserialize_with = "lenient_object")]
    pub secure_mab_options: Option<SecureMabOptions>,
}

/// A MAC-based account as returned by `GET /api/mac-based-accounts/{id}`
/// and inside search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountRecord {
    #[serde(rename = "AccountId", default, deserialize_with = "lenient")]
    pub account_id: Option<String>,
    #[serde(rename = "AccountName", default, deserialize_with = "lenient")]
    pub account_name: Option<String>,
    #[serde(rename = "Description", default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(rename = "BlockReason", default, deserialize_with = "lenient")]
    pub block_reason: Option<String>,
    #[serde(rename = "CreatedAt", default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(rename = "GroupId", default, deserialize_with = "lenient")]
    pub group_id: Option<String>,
    #[serde(rename = "IdentityType", default, deserialize_with = "lenient_int")]
    pub identity_type: Option<i64>,
    #[serde(rename = "IsBlockByAdmin", default, deserialize_with = "lenient")]
    pub is_block_by_admin: Option<bool>,
    #[serde(rename = "OrgId", default, deserialize_with = "lenient")]
    pub org_id: Option<String>,
    #[serde(rename = "LastUpdatedBy", default, deserialize_with = "lenient")]
    pub last_updated_by: Option<String>,
    #[serde(rename = "AgentlessOptions", default, deserialize_with = "lenient_object")]
    pub agentless_options: Option<AgentlessOptions>,
}

/// Response of `POST /api/mac-based-accounts/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "Accounts", default, deserialize_with = "lenient_vec")]
    pub accounts: Vec<AccountRecord>,
}

// ── Lenient field decoding ───────────────────────────────────────────

/// Decode a field, mapping `null` or a wrong-typed value to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode a nested struct only from a JSON object; anything else is `None`.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .is_object()
        .then(|| serde_json::from_value(value).ok())
        .flatten())
}

/// Decode a list of objects, mapping a wrong-typed value to an empty list
/// and skipping elements that are not objects or do not decode.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Integer fields that some tenants send as JSON floats (`2.0`).
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .and_then(|f| format!("{:.0}", f.trunc()).parse().ok())
    }))
}
