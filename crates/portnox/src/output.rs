//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use portnox_core::{Account, Diagnostic, MacEntry, Severity};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single item; `detail_fn` supplies the table view.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a non-fatal diagnostic to stderr.
pub fn print_diagnostic(diag: &Diagnostic, color: &ColorMode) {
    let label = diag.severity.to_string();
    let label = match (should_color(color), diag.severity) {
        (false, _) => label,
        (true, Severity::Warning) => label.yellow().bold().to_string(),
    };
    eprintln!("{label}: {}\n  {}", diag.summary, diag.detail);
}

// ── Domain views ─────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct MacRow {
    #[tabled(rename = "MAC Address")]
    mac: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Expiration")]
    expiration: String,
}

impl From<&MacEntry> for MacRow {
    fn from(entry: &MacEntry) -> Self {
        Self {
            mac: entry.mac_address.clone(),
            description: entry.description.clone(),
            expiration: entry.expiration.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

pub fn render_entries(format: &OutputFormat, entries: &[MacEntry]) -> Result<String, CliError> {
    render_list(format, entries, |e| MacRow::from(e), |e| e.mac_address.clone())
}

/// Table of whitelist entries, used inside detail views.
pub fn entry_table(entries: &[MacEntry]) -> String {
    let rows: Vec<MacRow> = entries.iter().map(MacRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Key/value detail view of an account.
pub fn account_detail(account: &Account) -> String {
    let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());

    let mut out = String::new();
    let _ = writeln!(out, "Name:            {}", account.account_name);
    let _ = writeln!(out, "ID:              {}", opt(&account.account_id));
    let _ = writeln!(out, "Description:     {}", opt(&account.description));
    let _ = writeln!(out, "Group:           {}", opt(&account.group_id));
    let _ = writeln!(out, "Org:             {}", opt(&account.org_id));
    let _ = writeln!(out, "Created:         {}", opt(&account.created_at));
    if !account.last_updated_by.is_empty() {
        let _ = writeln!(out, "Last updated by: {}", account.last_updated_by);
    }
    if account.is_block_by_admin == Some(true) {
        let _ = writeln!(out, "Blocked:         {}", opt(&account.block_reason));
    }
    for (key, value) in &account.secure_mab_options {
        let _ = writeln!(out, "Secure MAB {key}: {value}");
    }
    for vendor in &account.vendors_whitelist {
        let _ = writeln!(
            out,
            "Vendor:          {} ({})",
            vendor.vendor_name,
            vendor.vendor_prefixes.join(", ")
        );
    }
    if !account.mac_whitelist.is_empty() {
        out.push_str(&entry_table(&account.mac_whitelist));
    }
    out.trim_end().to_owned()
}
