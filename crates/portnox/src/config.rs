//! Glue between global CLI flags and `portnox_config` profiles.
//!
//! Flags override the profile; the profile overrides file-level defaults.

use portnox_config::{Config, Profile, profile_to_provider_config};
use portnox_core::ProviderConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Profile selected by `--profile`, else the config's default.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| cfg.default_profile_name().to_owned())
}

/// Apply flag overrides on top of a profile.
fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref url) = global.base_url {
        profile.base_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    if global.retries.is_some() {
        profile.retries = global.retries;
    }
    if global.retry_interval.is_some() {
        profile.retry_interval = global.retry_interval;
    }
    profile
}

/// Build a `ProviderConfig` from the config file, the active profile, and
/// CLI overrides.
pub fn build_provider_config(global: &GlobalOpts) -> Result<ProviderConfig, CliError> {
    let cfg = portnox_config::load_config_or_default();
    resolve(&cfg, global)
}

fn resolve(cfg: &Config, global: &GlobalOpts) -> Result<ProviderConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);
    let profile = apply_overrides(cfg.profile(&profile_name)?, global);
    tracing::debug!(profile = %profile_name, base_url = %profile.base_url, "resolved profile");

    Ok(profile_to_provider_config(
        &profile,
        &profile_name,
        &cfg.defaults,
        global.api_key.as_deref(),
    )?)
}
