// ── Runtime provider configuration ──
//
// Describes how to reach the Portnox API: credential, base URL, retry and
// transport tuning. Never touches disk; the CLI resolves profiles and
// hands a `ProviderConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use portnox_api::{DEFAULT_BASE_URL, PortnoxClient, RetryPolicy, TlsMode, TransportConfig};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification.
    DangerAcceptInvalid,
}

/// Configuration for one Portnox tenant.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API root, e.g. `https://clear.portnox.com:8081/CloudPortalBackEnd`.
    pub base_url: String,
    /// Bearer token. Must not be empty.
    pub api_key: SecretString,
    /// Total attempts per call while rate limited.
    pub retries: u32,
    /// Base backoff interval; doubled per attempt.
    pub retry_interval: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    pub tls: TlsVerification,
}

impl ProviderConfig {
    /// Defaults for everything except the credential.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key,
            retries: 3,
            retry_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
            tls: TlsVerification::default(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, self.retry_interval)
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }

    /// Build the API client, rejecting an empty credential up front.
    pub fn build_client(&self) -> Result<PortnoxClient, CoreError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(CoreError::Config {
                message: "api_key must be set".into(),
            });
        }
        Ok(PortnoxClient::from_api_key(
            &self.base_url,
            &self.api_key,
            &self.transport(),
            self.retry_policy(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        let config = ProviderConfig::new(SecretString::from("  ".to_owned()));
        assert!(matches!(
            config.build_client(),
            Err(CoreError::Config { .. })
        ));
    }

    #[test]
    fn defaults_match_portnox_cloud() {
        let config = ProviderConfig::new(SecretString::from("key".to_owned()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.retry_policy().max_attempts, 3);
        assert_eq!(config.retry_policy().base_interval, Duration::from_secs(1));
    }
}
