// ── Input validation ──
//
// Plain predicates over declared values, checked before any network call.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::model::MacEntry;

/// Six hex octets separated by `:` or `-` (separators may be mixed).
pub const MAC_PATTERN: &str = r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$";

pub const DESCRIPTION_MAX_LEN: usize = 64;

static MAC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MAC_PATTERN).expect("MAC_REGEX should compile - this is a bug"));

static DESCRIPTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9-]*$").expect("DESCRIPTION_REGEX should compile - this is a bug")
});

pub fn is_valid_mac(mac: &str) -> bool {
    MAC_REGEX.is_match(mac)
}

/// At most 64 characters of `[a-zA-Z0-9-]`. Empty is allowed.
pub fn is_valid_description(description: &str) -> bool {
    description.chars().count() <= DESCRIPTION_MAX_LEN && DESCRIPTION_REGEX.is_match(description)
}

pub fn validate_account_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("account_name must not be empty"));
    }
    Ok(())
}

pub fn validate_entry(entry: &MacEntry) -> Result<(), CoreError> {
    if !is_valid_mac(&entry.mac_address) {
        return Err(CoreError::validation(format!(
            "invalid MAC address format: {:?}",
            entry.mac_address
        )));
    }
    if !is_valid_description(&entry.description) {
        return Err(CoreError::validation(format!(
            "description for {} must be at most {DESCRIPTION_MAX_LEN} characters of letters, digits and '-': {:?}",
            entry.mac_address, entry.description
        )));
    }
    Ok(())
}

/// Validate every entry and reject duplicate MAC keys.
pub fn validate_entries(entries: &[MacEntry]) -> Result<(), CoreError> {
    let mut seen = std::collections::HashSet::with_capacity(entries.len());
    for entry in entries {
        validate_entry(entry)?;
        if !seen.insert(entry.mac_address.as_str()) {
            return Err(CoreError::validation(format!(
                "duplicate MAC address: {}",
                entry.mac_address
            )));
        }
    }
    Ok(())
}
