//! Configuration for the portnox CLI.
//!
//! TOML profiles, credential resolution (flag, env, keyring, plaintext),
//! and translation to `portnox_core::ProviderConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use portnox_core::{DEFAULT_BASE_URL, ProviderConfig, TlsVerification};

/// Environment variable consulted after the profile's own `api_key_env`.
pub const API_KEY_ENV: &str = "TF_VAR_PORTNOX_API_KEY";

const KEYRING_SERVICE: &str = "portnox";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named tenant profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile, falling back to an all-defaults one for the
    /// default profile name so env-only setups work without a file.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if Some(name) == self.default_profile.as_deref() => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile(name.into())),
        }
    }

    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Attempts per call while rate limited.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Base backoff interval in seconds.
    #[serde(default = "default_retry_interval")]
    pub retry_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            retries: default_retries(),
            retry_interval: default_retry_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_retries() -> u32 {
    3
}
fn default_retry_interval() -> u64 {
    1
}

/// A named Portnox tenant profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Override retry attempts.
    pub retries: Option<u32>,

    /// Override base retry interval (seconds).
    pub retry_interval: Option<u64>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            api_key_env: None,
            retries: None,
            retry_interval: None,
            timeout: None,
            ca_cert: None,
            insecure: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "portnox", "portnox").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("portnox");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, then `PORTNOX_` environment overrides.
///
/// Nested keys use a double underscore: `PORTNOX_DEFAULTS__RETRIES=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PORTNOX_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve an API key: CLI flag, profile `api_key_env`,
/// `TF_VAR_PORTNOX_API_KEY`, system keyring, then plaintext.
pub fn resolve_api_key(
    profile: &Profile,
    profile_name: &str,
    flag: Option<&str>,
) -> Result<SecretString, ConfigError> {
    resolve_api_key_with(
        profile,
        profile_name,
        flag,
        |name| std::env::var(name).ok(),
        keyring_api_key,
    )
}

fn resolve_api_key_with(
    profile: &Profile,
    profile_name: &str,
    flag: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    let non_empty = |s: &String| !s.trim().is_empty();

    // 1. Explicit flag
    if let Some(key) = flag.map(String::from).filter(non_empty) {
        return Ok(SecretString::from(key));
    }

    // 2. Profile's api_key_env
    if let Some(key) = profile.api_key_env.as_deref().and_then(&env).filter(non_empty) {
        return Ok(SecretString::from(key));
    }

    // 3. Well-known variable
    if let Some(key) = env(API_KEY_ENV).filter(non_empty) {
        return Ok(SecretString::from(key));
    }

    // 4. System keyring
    if let Some(key) = keyring(profile_name).filter(non_empty) {
        return Ok(SecretString::from(key));
    }

    // 5. Plaintext in config
    if let Some(key) = profile.api_key.clone().filter(non_empty) {
        return Ok(SecretString::from(key));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key"))
}

fn keyring_api_key(profile_name: &str) -> Option<String> {
    keyring_entry(profile_name).ok()?.get_password().ok()
}

/// Store an API key for `profile_name` in the system keyring.
pub fn store_api_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(key)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ProviderConfig` from a profile, the file-level defaults, and
/// an optional CLI key override.
pub fn profile_to_provider_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    key_flag: Option<&str>,
) -> Result<ProviderConfig, ConfigError> {
    url::Url::parse(&profile.base_url).map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {}", profile.base_url),
    })?;

    let api_key = resolve_api_key(profile, profile_name, key_flag)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ProviderConfig {
        base_url: profile.base_url.clone(),
        api_key,
        retries: profile.retries.unwrap_or(defaults.retries),
        retry_interval: Duration::from_secs(profile.retry_interval.unwrap_or(defaults.retry_interval)),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        tls,
    })
}
