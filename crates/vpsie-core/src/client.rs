//! HTTP client shared by every VPSie resource service.
//!
//! [`ServiceClient`] owns the transport: it joins resource paths onto the API base
//! URL, injects the access token, sends a single request and decodes either the
//! `{error, data}` envelope or the bare status body. Failures are mapped to
//! [`Error`] and returned as-is; nothing here retries.

use crate::config::VpsieClientConfig;
use crate::envelope::{Envelope, Status};
use crate::{Error, Result};
use reqwest::{Client, ClientBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub use reqwest::Method;

/// Public VPSie API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.vpsie.com";

/// Header carrying the access token.
pub const AUTH_HEADER: &str = "Vpsie-Auth";

/// Default timeout for Kubernetes requests; cluster calls are slow to acknowledge.
pub const K8S_DEFAULT_TIMEOUT: u64 = 60;

/// Default timeout for snapshot requests.
pub const SNAPSHOT_DEFAULT_TIMEOUT: u64 = 30;

/// Default timeout when no service-specific value applies.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Seconds an idle pooled connection is kept.
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Idle connections kept per host.
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

const USER_AGENT: &str = concat!("vpsie-core/", env!("CARGO_PKG_VERSION"));

/// Transport tuning for a [`ServiceClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// How long an idle pooled connection is kept.
    pub idle_timeout: Duration,
    /// Idle connections kept per host.
    pub max_idle_connections: usize,
    /// Emit an `info` event for every outgoing request.
    pub log_requests: bool,
    /// Accept gzip-encoded responses.
    pub gzip: bool,
}

impl ClientConfig {
    /// Defaults: 30s request timeout, 10s connect, pooled keep-alive, gzip on.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            max_idle_connections: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            log_requests: true,
            gzip: true,
        }
    }

    /// Set the whole-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set how long idle connections stay pooled.
    #[must_use]
    pub const fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the number of idle connections kept per host.
    #[must_use]
    pub const fn with_max_idle_connections(mut self, max: usize) -> Self {
        self.max_idle_connections = max;
        self
    }

    /// Toggle per-request `info` events.
    #[must_use]
    pub const fn with_request_logging(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    /// Toggle gzip response decoding.
    #[must_use]
    pub const fn with_gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    user_agent: String,
    token: Option<SecretString>,
    tls_verify: bool,
    tls_ca_cert: Option<PathBuf>,
}

impl ServiceClientBuilder {
    /// Create a builder for the given base URL and request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the URL cannot be parsed or cannot
    /// carry paths.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            http_config: ClientConfig::new().with_timeout(timeout),
            user_agent: USER_AGENT.to_string(),
            token: None,
            tls_verify: true,
            tls_ca_cert: None,
        })
    }

    /// Create a builder from a [`VpsieClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured API URL is invalid.
    pub fn from_config(config: &VpsieClientConfig) -> Result<Self> {
        let mut builder = Self::new(&config.api_url, config.timeout())?;
        builder.token = config.access_token.clone();
        builder.tls_verify = config.tls_verify;
        builder.tls_ca_cert = config.tls_ca_cert.clone();
        Ok(builder)
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Configure the access token sent in the `Vpsie-Auth` header.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Trust an additional PEM-encoded CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the CA certificate cannot be loaded or
    /// the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let http_config = self.http_config;

        let mut builder = ClientBuilder::new()
            .user_agent(self.user_agent)
            .timeout(http_config.timeout)
            .connect_timeout(http_config.connect_timeout)
            .pool_idle_timeout(http_config.idle_timeout)
            .pool_max_idle_per_host(http_config.max_idle_connections)
            .gzip(http_config.gzip);

        if !self.tls_verify {
            warn!("TLS verification disabled for VPSie client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &self.tls_ca_cert {
            debug!("loading VPSie CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(ServiceClient {
            http,
            base_url: self.base_url,
            token: self.token,
            log_requests: http_config.log_requests,
        })
    }
}

/// Shared asynchronous client for the VPSie API.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: Url,
    token: Option<SecretString>,
    log_requests: bool,
}

impl ServiceClient {
    /// Construct a client from a [`VpsieClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot produce a client.
    pub fn from_config(config: &VpsieClientConfig) -> Result<Self> {
        ServiceClientBuilder::from_config(config)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns true if requests carry an access token.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid API path `{path}`: {err}")))
    }

    /// Send one request and return the response if its status is a success.
    ///
    /// # Errors
    ///
    /// Transport failures are converted with `From<reqwest::Error>`; non-2xx
    /// statuses are mapped with [`Error::from_status`].
    pub async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.build_url(path)?;
        let mut request = self
            .http
            .request(method.clone(), url)
            .header("Accept", "application/json");

        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(token) = &self.token {
            request = request.header(AUTH_HEADER, token.expose_secret());
        }
        if let Some(payload) = body {
            request = request.json(payload);
        }

        if self.log_requests {
            info!(%method, path, ?params, "VPSie request");
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%method, path, %status, "VPSie response");

        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(Error::from_status(status, &text))
    }

    /// Send a request and decode the `{error, data}` envelope.
    ///
    /// # Errors
    ///
    /// Returns the mapped HTTP error, [`Error::ApiError`] when the envelope is
    /// flagged, or [`Error::ParseError`] when the body does not match `R`.
    pub async fn json<B, R>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<Envelope<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.execute(method, path, params, body).await?;
        let text = response.text().await?;
        decode_envelope(path, &text)
    }

    /// Send a request whose response carries no data.
    ///
    /// An empty or non-JSON body counts as success; a JSON body with
    /// `"error": true` becomes [`Error::ApiError`].
    ///
    /// # Errors
    ///
    /// Returns the mapped HTTP error or [`Error::ApiError`].
    pub async fn empty<B>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let response = self.execute(method, path, params, body).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(());
        }
        match serde_json::from_str::<Status>(&text) {
            Ok(status) => status.into_result(),
            Err(_) => {
                debug!(path, "ignoring non-JSON response body");
                Ok(())
            }
        }
    }
}

fn decode_envelope<R>(path: &str, text: &str) -> Result<Envelope<R>>
where
    R: DeserializeOwned,
{
    // A flagged envelope may carry `data: null`, so check the flag before the typed decode.
    if let Ok(status) = serde_json::from_str::<Status>(text) {
        status.into_result()?;
    }

    serde_json::from_str::<Envelope<R>>(text).map_err(|err| {
        Error::ParseError(format!("Failed to parse VPSie response for `{path}`: {err}"))
    })
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidEndpoint(format!(
            "Base URL cannot carry paths: {raw}"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
