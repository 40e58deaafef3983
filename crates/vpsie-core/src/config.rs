//! Configuration structures for VPSie clients.
//!
//! This module provides the configuration used to connect to the VPSie API,
//! including the access token, TLS settings and validation.

use crate::client::DEFAULT_API_URL;
use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Configuration for a VPSie client instance.
///
/// The access token is never serialized and is redacted from `Debug` output.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VpsieClientConfig {
    /// API base URL
    #[validate(url)]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Access token sent in the `Vpsie-Auth` header
    #[serde(default, skip_serializing)]
    pub access_token: Option<SecretString>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to custom CA certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<std::path::PathBuf>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl VpsieClientConfig {
    /// Create a new client configuration for the given API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(api_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_url: api_url.into(),
            ..Self::default()
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: std::path::PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse and validate the API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_api_url(&self) -> Result<Url, Error> {
        Url::parse(&self.api_url).map_err(|e| Error::ConfigError(format!("Invalid API URL: {e}")))
    }
}

impl Default for VpsieClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            access_token: None,
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_config_new() {
        let config = VpsieClientConfig::new("https://api.example.com").unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert!(config.access_token.is_none());
        assert!(config.tls_verify);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_config_invalid_url() {
        let result = VpsieClientConfig::new("not-a-url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_default_points_at_public_api() {
        let config = VpsieClientConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = VpsieClientConfig::new("https://api.example.com")
            .unwrap()
            .with_access_token("token-123")
            .with_tls_verify(false)
            .with_timeout(60);

        assert_eq!(
            config.access_token.as_ref().map(|token| token.expose_secret()),
            Some("token-123")
        );
        assert!(!config.tls_verify);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_config_parse_api_url() {
        let config = VpsieClientConfig::new("https://api.example.com:8443").unwrap();
        let url = config.parse_api_url().unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("api.example.com"));
        assert_eq!(url.port(), Some(8443));
    }

    #[test]
    fn test_access_token_is_not_serialized() {
        let config = VpsieClientConfig::default().with_access_token("super-secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(!json.contains("access_token"));
    }

    #[test]
    fn test_access_token_is_redacted_in_debug() {
        let config = VpsieClientConfig::default().with_access_token("super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: VpsieClientConfig =
            serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(
            config.access_token.as_ref().map(|token| token.expose_secret()),
            Some("abc")
        );
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = VpsieClientConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 301;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        assert!(config.validate().is_ok());
    }
}
