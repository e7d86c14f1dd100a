// ── API-to-domain type conversions ──
//
// Bridges `portnox_api::models` wire types and `crate::model` domain types
// in both directions.

use std::collections::BTreeMap;

use portnox_api::models::{
    AccountRecord, MacWhitelistEntry, MacWhitelistItem, SecureMabOptions, VendorItem,
};

use crate::model::{Account, MacEntry, VendorEntry};

// ── Wire → domain ──────────────────────────────────────────────────

impl From<MacWhitelistItem> for MacEntry {
    fn from(item: MacWhitelistItem) -> Self {
        MacEntry::new(item.mac, item.description, item.expiration)
    }
}

impl From<VendorItem> for VendorEntry {
    fn from(item: VendorItem) -> Self {
        Self {
            vendor_name: item.vendor_name,
            vendor_prefixes: item.vendor_prefixes,
        }
    }
}

fn secure_mab_map(options: Option<SecureMabOptions>) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    if let Some(options) = options {
        if let Some(action) = options.action {
            map.insert("action".to_owned(), action.to_string());
        }
        if let Some(enabled) = options.enabled {
            map.insert("enabled".to_owned(), enabled.to_string());
        }
    }
    map
}

impl Account {
    /// Build from a wire record, falling back to `requested` for the name.
    pub fn from_record(record: AccountRecord, requested: &str) -> Self {
        let options = record.agentless_options.unwrap_or_default();
        Self {
            account_id: record.account_id,
            account_name: record
                .account_name
                .unwrap_or_else(|| requested.to_owned()),
            description: record.description,
            block_reason: record.block_reason,
            created_at: record.created_at,
            group_id: record.group_id,
            identity_type: record.identity_type,
            is_block_by_admin: record.is_block_by_admin,
            org_id: record.org_id,
            last_updated_by: record.last_updated_by.unwrap_or_default(),
            mac_whitelist: options.mac_whitelist.into_iter().map(MacEntry::from).collect(),
            vendors_whitelist: options
                .vendors_whitelist
                .into_iter()
                .map(VendorEntry::from)
                .collect(),
            secure_mab_options: secure_mab_map(options.secure_mab_options),
        }
    }
}

// ── Domain → wire ──────────────────────────────────────────────────

/// Entry for an add call: `Description` always sent, `Expiration` only when set.
pub fn add_entry(entry: &MacEntry) -> MacWhitelistEntry {
    MacWhitelistEntry {
        mac: entry.mac_address.clone(),
        description: Some(entry.description.clone()),
        expiration: entry.expiration.clone(),
    }
}

/// Entry for a remove call that matches on the stored values as well as the MAC.
pub fn remove_exact(entry: &MacEntry) -> MacWhitelistEntry {
    add_entry(entry)
}

/// Entry for a remove call that matches on the MAC alone.
pub fn remove_by_mac(mac: &str) -> MacWhitelistEntry {
    MacWhitelistEntry::by_mac(mac)
}
