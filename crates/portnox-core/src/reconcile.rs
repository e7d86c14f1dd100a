// ── Order-preserving reconciler ──
//
// Diffs a declared whitelist against the previously known one, issues
// the minimal remove/add calls, and re-assembles results in the order
// the caller declared them. Entries are keyed by `mac_address` alone.

use indexmap::IndexMap;
use tracing::{debug, info};

use portnox_api::PortnoxClient;
use portnox_api::models::WhitelistRequest;

use crate::convert::{add_entry, remove_by_mac, remove_exact};
use crate::error::CoreError;
use crate::model::{DeclaredOrder, MacEntry};

/// Key a list by MAC address, keeping first-seen order.
///
/// A repeated key keeps its first position and takes the later values.
pub fn keyed(entries: &[MacEntry]) -> IndexMap<&str, &MacEntry> {
    let mut map = IndexMap::with_capacity(entries.len());
    for entry in entries {
        map.insert(entry.mac_address.as_str(), entry);
    }
    map
}

/// An entry present on both sides whose description or expiration changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub previous: MacEntry,
    pub declared: MacEntry,
}

/// The calls needed to move a whitelist from `previous` to `declared`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Previous entries whose key is no longer declared, in previous order.
    pub to_remove: Vec<MacEntry>,
    /// Changed entries, in previous order.
    pub to_replace: Vec<Replacement>,
    /// Keys declared now but not tracked before, in declared order.
    pub to_create: Vec<String>,
    /// The full declared set, in declared order.
    pub to_add_or_update: Vec<MacEntry>,
}

impl ReconcilePlan {
    pub fn diff(previous: &[MacEntry], declared: &[MacEntry]) -> Self {
        let previous_by_key = keyed(previous);
        let declared_by_key = keyed(declared);

        let mut plan = Self::default();

        for (key, old) in &previous_by_key {
            match declared_by_key.get(key) {
                None => plan.to_remove.push((*old).clone()),
                Some(new)
                    if old.description != new.description || old.expiration != new.expiration =>
                {
                    plan.to_replace.push(Replacement {
                        previous: (*old).clone(),
                        declared: (*new).clone(),
                    });
                }
                Some(_) => {}
            }
        }

        plan.to_create = declared_by_key
            .keys()
            .filter(|key| !previous_by_key.contains_key(*key))
            .map(|key| (*key).to_owned())
            .collect();

        plan.to_add_or_update = declared_by_key.into_values().cloned().collect();
        plan
    }

    /// Nothing to remove, replace, or create.
    pub fn is_noop(&self) -> bool {
        self.to_remove.is_empty() && self.to_replace.is_empty() && self.to_create.is_empty()
    }

    pub fn remove_calls(&self) -> usize {
        self.to_remove.len() + self.to_replace.len()
    }

    /// The batched add is skipped for a no-op plan or an empty declared set.
    pub fn needs_add(&self) -> bool {
        !self.is_noop() && !self.to_add_or_update.is_empty()
    }

    /// Issue the plan: removes one at a time, then a single batched add.
    ///
    /// Stops at the first failure with no rollback. Re-running converges
    /// because add and remove are idempotent per MAC key.
    pub async fn apply(&self, client: &PortnoxClient, account_name: &str) -> Result<(), CoreError> {
        if self.is_noop() {
            debug!(account = account_name, "whitelist unchanged, no calls issued");
            return Ok(());
        }

        info!(
            account = account_name,
            remove = self.to_remove.len(),
            replace = self.to_replace.len(),
            create = self.to_create.len(),
            "reconciling MAC whitelist"
        );

        for entry in &self.to_remove {
            debug!(mac = %entry.mac_address, "removing entry no longer declared");
            remove_one(client, account_name, remove_by_mac(&entry.mac_address)).await?;
        }

        for replacement in &self.to_replace {
            debug!(mac = %replacement.previous.mac_address, "removing entry before re-adding with new values");
            remove_one(client, account_name, remove_exact(&replacement.previous)).await?;
        }

        if self.needs_add() {
            let request = WhitelistRequest {
                account_name: account_name.to_owned(),
                mac_whitelist: self.to_add_or_update.iter().map(add_entry).collect(),
            };
            client.add_mac_whitelist(&request).await?;
        }

        Ok(())
    }
}

async fn remove_one(
    client: &PortnoxClient,
    account_name: &str,
    entry: portnox_api::models::MacWhitelistEntry,
) -> Result<(), CoreError> {
    let request = WhitelistRequest {
        account_name: account_name.to_owned(),
        mac_whitelist: vec![entry],
    };
    client.remove_mac_whitelist(&request).await?;
    Ok(())
}

/// Remove every tracked entry, one call each, matching on MAC only.
pub async fn remove_all(
    client: &PortnoxClient,
    account_name: &str,
    entries: &[MacEntry],
) -> Result<(), CoreError> {
    for key in keyed(entries).keys() {
        remove_one(client, account_name, remove_by_mac(key)).await?;
    }
    Ok(())
}

// ── Ordering ─────────────────────────────────────────────────────────

/// Stable sort by MAC address, then description.
pub fn sort_entries(entries: &mut [MacEntry]) {
    entries.sort_by(|a, b| {
        a.mac_address
            .cmp(&b.mac_address)
            .then_with(|| a.description.cmp(&b.description))
    });
}

/// Emit `entries` with declared keys first, in declared order, followed
/// by any other keys sorted by MAC then description.
pub fn reorder(mut entries: Vec<MacEntry>, order: &DeclaredOrder) -> Vec<MacEntry> {
    sort_entries(&mut entries);

    let mut by_key: IndexMap<String, MacEntry> = IndexMap::with_capacity(entries.len());
    for entry in entries {
        by_key.insert(entry.mac_address.clone(), entry);
    }

    let mut ordered = Vec::with_capacity(by_key.len());
    for key in order.keys() {
        if let Some(entry) = by_key.shift_remove(key) {
            ordered.push(entry);
        }
    }
    ordered.extend(by_key.into_values());
    ordered
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(mac: &str, description: &str) -> MacEntry {
        MacEntry::new(mac, description, None)
    }

    fn macs(entries: &[MacEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.mac_address.as_str()).collect()
    }

    #[test]
    fn removed_key_and_new_key() {
        let previous = [entry("01", "foo"), entry("03", "baz")];
        let declared = [entry("01", "foo"), entry("02", "bar")];

        let plan = ReconcilePlan::diff(&previous, &declared);

        assert_eq!(plan.to_remove, vec![entry("03", "baz")]);
        assert!(plan.to_replace.is_empty());
        assert_eq!(plan.to_create, vec!["02".to_owned()]);
        assert_eq!(plan.to_add_or_update, declared.to_vec());
        assert_eq!(plan.remove_calls(), 1);
        assert!(plan.needs_add());
    }

    #[test]
    fn unchanged_set_is_noop() {
        let previous = [entry("01", "foo"), entry("02", "bar")];
        let declared = [entry("02", "bar"), entry("01", "foo")];

        let plan = ReconcilePlan::diff(&previous, &declared);

        assert!(plan.is_noop());
        assert_eq!(plan.remove_calls(), 0);
        assert!(!plan.needs_add());
    }

    #[test]
    fn description_or_expiration_change_is_a_replace() {
        let previous = [
            entry("01", "foo"),
            MacEntry::new("02", "bar", Some("2030-01-01".into())),
        ];
        let declared = [
            entry("01", "renamed"),
            MacEntry::new("02", "bar", None),
        ];

        let plan = ReconcilePlan::diff(&previous, &declared);

        assert!(plan.to_remove.is_empty());
        assert_eq!(plan.to_replace.len(), 2);
        assert_eq!(plan.to_replace[0].previous, entry("01", "foo"));
        assert_eq!(plan.to_replace[0].declared, entry("01", "renamed"));
        assert_eq!(plan.to_replace[1].previous.expiration.as_deref(), Some("2030-01-01"));
        assert!(plan.needs_add());
    }

    #[test]
    fn empty_declared_only_removes() {
        let plan = ReconcilePlan::diff(&[entry("01", "a")], &[]);
        assert_eq!(plan.remove_calls(), 1);
        assert!(!plan.needs_add());
    }

    #[test]
    fn reorder_follows_declared_order() {
        let declared = [entry("AA:01", "x"), entry("AA:02", "y")];
        let remote = vec![entry("AA:02", "y"), entry("AA:01", "x")];

        let ordered = reorder(remote, &DeclaredOrder::from_entries(&declared));

        assert_eq!(macs(&ordered), vec!["AA:01", "AA:02"]);
    }

    #[test]
    fn reorder_appends_extras_sorted() {
        let order = DeclaredOrder::from_entries(&[entry("05", "")]);
        let remote = vec![entry("09", ""), entry("05", ""), entry("02", "b"), entry("01", "")];

        let ordered = reorder(remote, &order);

        assert_eq!(macs(&ordered), vec!["05", "01", "02", "09"]);
    }

    #[test]
    fn reorder_skips_declared_keys_missing_remotely() {
        let order = DeclaredOrder::from_entries(&[entry("07", ""), entry("01", "")]);
        let ordered = reorder(vec![entry("01", "")], &order);
        assert_eq!(macs(&ordered), vec!["01"]);
    }
}
