// Portnox API HTTP client
//
// Wraps `reqwest::Client` with bearer authentication, URL construction
// under the configured base path, full request/response tracing with the
// credential masked, and the retry controller. Endpoint methods live in
// `accounts.rs` as inherent methods.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::retry::{self, RetryPolicy};
use crate::transport::TransportConfig;

/// Default Portnox Cloud API root.
pub const DEFAULT_BASE_URL: &str = "https://clear.portnox.com:8081/CloudPortalBackEnd";

const MASK: &str = "*************************";

/// Mask a credential for logging: first and last character, fixed mask between.
pub fn mask_secret(secret: &str) -> String {
    let mut chars = secret.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => format!("{first}{MASK}{last}"),
        _ => MASK.to_owned(),
    }
}

/// Async client for the Portnox MAC-based account API.
///
/// Holds only read-only configuration (base URL, retry policy, masked
/// credential for logs) plus a pooled `reqwest::Client`, so a single
/// instance can serve concurrent operations on different accounts.
pub struct PortnoxClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
    masked_key: String,
}

impl PortnoxClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key, base URL, transport config, and retry policy.
    ///
    /// Injects `Authorization: Bearer <key>` and `Content-Type:
    /// application/json` as default headers on every request.
    pub fn from_api_key(
        base_url: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
        retry: RetryPolicy,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid API key header value: {e}"),
            })?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = transport.build_client_with_headers(headers)?;
        let masked_key = mask_secret(api_key.expose_secret());
        Self::with_client(http, base_url, retry, masked_key)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        retry: RetryPolicy,
    ) -> Result<Self, Error> {
        Self::with_client(http, base_url, retry, MASK.to_owned())
    }

    fn with_client(
        http: reqwest::Client,
        base_url: &str,
        retry: RetryPolicy,
        masked_key: String,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.into()));
        }
        Ok(Self {
            http,
            base_url,
            retry,
            masked_key,
        })
    }

    /// The configured API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The retry policy applied by [`request_with_retry`](Self::request_with_retry).
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments under the base path, percent-encoding each.
    ///
    /// `["api", "mac-based-accounts", "lobby tv"]` on the default base
    /// yields `…/CloudPortalBackEnd/api/mac-based-accounts/lobby%20tv`.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Executor ─────────────────────────────────────────────────────

    /// Issue a single request and classify the outcome.
    ///
    /// Status below 400 returns the raw body. 429 maps to
    /// [`Error::RateLimited`], any other status >= 400 to
    /// [`Error::RequestFailed`], and send failures to [`Error::Transport`].
    pub async fn execute<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<Bytes, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(Error::Encode)?;

        let authorization = format!("Bearer {}", self.masked_key);
        debug!(
            method = %method,
            url = %url,
            authorization = %authorization,
            content_type = "application/json",
            body = %payload.as_deref().map(String::from_utf8_lossy).unwrap_or_default(),
            "full API request"
        );

        let mut builder = self.http.request(method, url);
        if let Some(payload) = payload {
            builder = builder.body(payload);
        }

        let resp = builder.send().await.map_err(|e| {
            debug!(error = %e, "HTTP request failed");
            Error::Transport(e)
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await?;

        debug!(
            status = %status,
            headers = ?headers,
            body = %String::from_utf8_lossy(&bytes),
            "full API response"
        );

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited {
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        if status.as_u16() >= 400 {
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes)
    }

    /// [`execute`](Self::execute) under the client's [`RetryPolicy`].
    pub async fn request_with_retry<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Bytes, Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        debug!(
            method = %method,
            url = %url,
            max_attempts = self.retry.max_attempts,
            retry_interval_ms = u64::try_from(self.retry.base_interval.as_millis()).unwrap_or(u64::MAX),
            "starting request with retry"
        );
        retry::with_backoff(&self.retry, |_| {
            self.execute(method.clone(), url.clone(), body)
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mask_keeps_first_and_last_character() {
        assert_eq!(mask_secret("abcdef"), "a*************************f");
        assert_eq!(mask_secret("ab"), "a*************************b");
    }

    #[test]
    fn mask_short_secrets_entirely() {
        assert_eq!(mask_secret(""), MASK);
        assert_eq!(mask_secret("x"), MASK);
    }

    #[test]
    fn mask_is_char_aware() {
        assert_eq!(mask_secret("ékey§"), "é*************************§");
    }

    #[test]
    fn endpoint_keeps_base_path_and_encodes_segments() {
        let client = PortnoxClient::from_reqwest(
            DEFAULT_BASE_URL,
            reqwest::Client::new(),
            RetryPolicy::default(),
        )
        .unwrap();

        let url = client
            .endpoint(&["api", "mac-based-accounts", "lobby tv"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://clear.portnox.com:8081/CloudPortalBackEnd/api/mac-based-accounts/lobby%20tv"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = PortnoxClient::from_reqwest(
            "http://localhost:9000/backend/",
            reqwest::Client::new(),
            RetryPolicy::default(),
        )
        .unwrap();

        let url = client.endpoint(&["api", "mac-based-accounts"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/backend/api/mac-based-accounts");
    }

    #[test]
    fn rejects_non_base_urls() {
        let result = PortnoxClient::from_reqwest(
            "mailto:ops@example.com",
            reqwest::Client::new(),
            RetryPolicy::default(),
        );
        assert!(matches!(result, Err(Error::InvalidBaseUrl(_))));
    }
}
