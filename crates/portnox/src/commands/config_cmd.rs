//! Config subcommand handlers.

use portnox_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASKED: &str = "********";

/// Replace plaintext keys before display.
fn masked(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some(MASKED.into());
        }
    }
    cfg
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = masked(portnox_config::load_config_or_default());
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| e.to_string()),
                |c| c.default_profile_name().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(
                &portnox_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        // ── SetKey ──────────────────────────────────────────────────
        ConfigCommand::SetKey { profile } => {
            let cfg = portnox_config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            let key = match global.api_key.clone() {
                Some(key) => key,
                None => rpassword::prompt_password(format!("API key for '{profile_name}': "))?,
            };
            if key.trim().is_empty() {
                return Err(CliError::validation("api_key", "API key cannot be empty"));
            }

            portnox_config::store_api_key(&profile_name, key.trim())?;
            if !global.quiet {
                eprintln!("API key for profile '{profile_name}' stored in system keyring");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn show_never_prints_plaintext_keys() {
        let cfg: Config = toml::from_str(
            r#"
            [profiles.default]
            api_key = "super-secret"
            "#,
        )
        .unwrap();
        let rendered = toml::to_string_pretty(&masked(cfg)).unwrap();
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains(MASKED));
    }
}
