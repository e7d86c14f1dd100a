//! Shared helpers for command handlers: prompts and file I/O.

use std::io::IsTerminal;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read declared configuration from a `.toml` or `.json` file.
pub fn read_declared<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CliError::validation("file", format!("{}: {e}", path.display())))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("toml") => toml::from_str(&contents)
            .map_err(|e| CliError::validation("file", format!("invalid TOML: {e}"))),
        Some("json") => serde_json::from_str(&contents)
            .map_err(|e| CliError::validation("file", format!("invalid JSON: {e}"))),
        _ => Err(CliError::validation(
            "file",
            format!("{}: expected a .toml or .json file", path.display()),
        )),
    }
}

/// Read a JSON state file written by an earlier command.
pub fn read_state<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CliError::validation("state", format!("{}: {e}", path.display())))?;
    serde_json::from_str(&contents)
        .map_err(|e| CliError::validation("state", format!("{}: {e}", path.display())))
}

/// Write state as pretty JSON, creating parent directories.
pub fn write_state<T: Serialize>(path: &Path, state: &T) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json + "\n")?;
    tracing::debug!(path = %path.display(), "state written");
    Ok(())
}

/// Delete a state file; a missing file is fine.
pub fn remove_state(path: &Path) -> Result<(), CliError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
