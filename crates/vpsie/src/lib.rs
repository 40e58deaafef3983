//! Typed async client for the VPSie cloud API.
//!
//! [`VpsieClient`] builds a single HTTP client from a [`VpsieClientConfig`]
//! and hands it to each resource service, so every service shares the same
//! connection pool, access token and TLS settings.
//!
//! ```no_run
//! use vpsie::{K8sService, ListOptions, VpsieClient, VpsieClientConfig};
//!
//! # async fn run() -> vpsie::Result<()> {
//! let config = VpsieClientConfig::default().with_access_token("token");
//! let client = VpsieClient::from_config(&config)?;
//! for cluster in client.k8s().list(&ListOptions::default()).await? {
//!     println!("{} ({} workers)", cluster.cluster_name, cluster.worker_count);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

use tracing::debug;
use url::Url;
use validator::Validate;

pub use vpsie_core::client::ClientConfig;
pub use vpsie_core::config::VpsieClientConfig;
pub use vpsie_core::{Envelope, Error, ListOptions, Page, Result};
pub use vpsie_k8s::{
    ClusterNode, CreateK8sRequest, K8sClient, K8sCluster, K8sClusterSummary, K8sService,
};
pub use vpsie_snapshot::{EnableAutoSnapshotRequest, Snapshot, SnapshotClient, SnapshotService};

use vpsie_core::client::ServiceClient;

/// Entry point bundling every VPSie resource service.
#[derive(Clone)]
pub struct VpsieClient {
    inner: ServiceClient,
    k8s: K8sClient,
    snapshots: SnapshotClient,
}

impl VpsieClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for an invalid configuration, or
    /// [`Error::ConfigError`] when the HTTP client cannot be built.
    pub fn from_config(config: &VpsieClientConfig) -> Result<Self> {
        config.validate()?;
        let inner = ServiceClient::from_config(config)?;
        debug!(base_url = %inner.base_url(), authenticated = inner.has_token(), "VPSie client ready");
        Ok(Self::from_service_client(inner))
    }

    /// Wrap an already configured shared client.
    #[must_use]
    pub fn from_service_client(inner: ServiceClient) -> Self {
        Self {
            k8s: K8sClient::from_service_client(inner.clone()),
            snapshots: SnapshotClient::from_service_client(inner.clone()),
            inner,
        }
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Kubernetes cluster operations.
    #[must_use]
    pub fn k8s(&self) -> &K8sClient {
        &self.k8s
    }

    /// Snapshot operations.
    #[must_use]
    pub fn snapshots(&self) -> &SnapshotClient {
        &self.snapshots
    }
}
