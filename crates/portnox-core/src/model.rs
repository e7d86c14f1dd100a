// ── Domain model ──
//
// Canonical account and whitelist types. These are what resource
// operations accept as declared configuration and return as state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One MAC whitelist entry. `mac_address` is the identity key.
///
/// `expiration` is `None` for "no expiration"; an empty string never
/// reaches this type (see [`MacEntry::new`] and the deserializer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacEntry {
    pub mac_address: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub expiration: Option<String>,
}

impl MacEntry {
    pub fn new(
        mac_address: impl Into<String>,
        description: impl Into<String>,
        expiration: Option<String>,
    ) -> Self {
        Self {
            mac_address: mac_address.into(),
            description: description.into(),
            expiration: expiration.filter(|e| !e.is_empty()),
        }
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

/// A vendor allowed by prefix (read-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorEntry {
    pub vendor_name: String,
    pub vendor_prefixes: Vec<String>,
}

/// A MAC-based account as read from the remote.
///
/// `secure_mab_options` is flattened to strings: `action` as an integer
/// string and `enabled` as `"true"` / `"false"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Option<String>,
    pub account_name: String,
    pub description: Option<String>,
    pub block_reason: Option<String>,
    pub created_at: Option<String>,
    pub group_id: Option<String>,
    pub identity_type: Option<i64>,
    pub is_block_by_admin: Option<bool>,
    pub org_id: Option<String>,
    #[serde(default)]
    pub last_updated_by: String,
    #[serde(default)]
    pub mac_whitelist: Vec<MacEntry>,
    #[serde(default)]
    pub vendors_whitelist: Vec<VendorEntry>,
    #[serde(default)]
    pub secure_mab_options: BTreeMap<String, String>,
}

/// The order in which MAC keys appear in the caller's configuration.
///
/// Captured at the start of every operation and passed along; never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredOrder(Vec<String>);

impl DeclaredOrder {
    pub fn from_entries(entries: &[MacEntry]) -> Self {
        Self(entries.iter().map(|e| e.mac_address.clone()).collect())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
