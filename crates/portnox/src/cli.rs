//! Clap derive structures for the `portnox` CLI.
//!
//! Defines the command tree, global flags, and shared types. Also pulled
//! into `build.rs` for man page generation, so it depends on clap only.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// portnox -- manage Portnox MAC-based accounts and whitelists
#[derive(Debug, Parser)]
#[command(
    name = "portnox",
    version,
    about = "Manage Portnox Cloud MAC-based accounts from the command line",
    long_about = "Declarative management of Portnox Cloud MAC-based accounts and\n\
        their MAC address whitelists.\n\n\
        Desired state is read from TOML or JSON files; resulting state is\n\
        written to JSON state files that later commands diff against.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "PORTNOX_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, env = "PORTNOX_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Portnox API key
    #[arg(long, env = "PORTNOX_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PORTNOX_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "PORTNOX_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "PORTNOX_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Total attempts per call while rate limited
    #[arg(long, env = "PORTNOX_RETRIES", global = true)]
    pub retries: Option<u32>,

    /// Base retry interval in seconds (doubled per attempt)
    #[arg(long, env = "PORTNOX_RETRY_INTERVAL", global = true)]
    pub retry_interval: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage MAC-based accounts
    #[command(alias = "acct")]
    Account(AccountArgs),

    /// Reconcile an account's MAC whitelist as a collection
    #[command(alias = "macs")]
    Addresses(AddressesArgs),

    /// Manage a single MAC whitelist entry
    #[command(alias = "mac")]
    Address(AddressArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared file arguments ────────────────────────────────────────────

/// Declared configuration input.
#[derive(Debug, Args)]
pub struct DeclaredFile {
    /// Declared configuration file (.toml or .json)
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

/// State file written after a successful operation.
#[derive(Debug, Args)]
pub struct StateFile {
    /// JSON state file
    #[arg(long, short = 's')]
    pub state: PathBuf,
}

// ── Account ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Create an account from a declared file
    Create {
        #[command(flatten)]
        declared: DeclaredFile,
        #[command(flatten)]
        state: StateFile,
    },

    /// Refresh an account's state; clears it if the account is gone
    Get {
        #[command(flatten)]
        state: StateFile,
        /// Declared configuration (controls whitelist reporting)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Show every attribute of an account
    Show {
        /// Account name or id
        id: String,
    },

    /// Delete an account and its whitelist
    #[command(alias = "rm")]
    Delete {
        /// Account name or id
        id: String,
        /// State file to remove afterwards
        #[arg(long, short = 's')]
        state: Option<PathBuf>,
    },
}

// ── Addresses ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddressesArgs {
    #[command(subcommand)]
    pub command: AddressesCommand,
}

#[derive(Debug, Subcommand)]
pub enum AddressesCommand {
    /// Create or update the whitelist to match the declared file
    Apply {
        #[command(flatten)]
        declared: DeclaredFile,
        #[command(flatten)]
        state: StateFile,
    },

    /// Refresh tracked entries from the API
    Refresh {
        #[command(flatten)]
        state: StateFile,
        /// Declared configuration (sets ordering)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Remove every tracked entry
    Destroy {
        #[command(flatten)]
        state: StateFile,
    },

    /// Adopt existing entries: `ACCOUNT` or `ACCOUNT,MAC1;MAC2`
    Import {
        id: String,
        #[command(flatten)]
        state: StateFile,
    },
}

// ── Address ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddressArgs {
    #[command(subcommand)]
    pub command: AddressCommand,
}

#[derive(Debug, Subcommand)]
pub enum AddressCommand {
    /// Add one entry from a declared file
    Add {
        #[command(flatten)]
        declared: DeclaredFile,
        #[command(flatten)]
        state: StateFile,
    },

    /// Show a tracked entry
    Show {
        #[command(flatten)]
        state: StateFile,
    },

    /// Remove a tracked entry
    #[command(alias = "rm")]
    Remove {
        #[command(flatten)]
        state: StateFile,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Store the API key for a profile in the system keyring
    SetKey {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
