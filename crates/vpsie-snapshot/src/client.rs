//! Asynchronous snapshot client implementation.

use crate::models::{
    CreateSnapshotRequest, DeleteSnapshotRequest, EnableAutoSnapshotRequest,
    RollbackSnapshotRequest, Snapshot,
};
use crate::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;
use validator::Validate;
use vpsie_core::client::{
    ClientConfig, ServiceClient, ServiceClientBuilder, SNAPSHOT_DEFAULT_TIMEOUT,
};
use vpsie_core::types::{require_identifier, validate_identifier, ApiResource, DeleteStatistic};
use vpsie_core::{ListOptions, Page};

const USER_AGENT: &str = concat!("vpsie-snapshot/", env!("CARGO_PKG_VERSION"));

/// Operations on VM snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotService: Send + Sync {
    /// List every snapshot visible to the account.
    async fn list(&self, options: &ListOptions) -> Result<Page<Snapshot>>;

    /// List snapshots taken from a single VM.
    async fn list_by_vm(&self, options: &ListOptions, vm_identifier: &str)
        -> Result<Page<Snapshot>>;

    /// Take a named snapshot of a VM.
    async fn create(&self, name: &str, vm_identifier: &str) -> Result<()>;

    /// Restore the VM a snapshot was taken from.
    async fn rollback(&self, snapshot_identifier: &str) -> Result<()>;

    /// Turn on scheduled snapshots for a VM.
    async fn enable_auto(&self, request: &EnableAutoSnapshotRequest) -> Result<()>;

    /// Delete a snapshot, recording why.
    async fn delete(&self, snapshot_identifier: &str, reason: &str, note: &str) -> Result<()>;
}

/// Builder for [`SnapshotClient`].
#[derive(Debug, Clone)]
pub struct SnapshotClientBuilder {
    inner: ServiceClientBuilder,
}

impl SnapshotClientBuilder {
    /// Create a builder for the specified base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder =
            ServiceClientBuilder::new(base_url, Duration::from_secs(SNAPSHOT_DEFAULT_TIMEOUT))?
                .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Configure the access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token(token);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SnapshotClient> {
        let inner = self.inner.build()?;
        Ok(SnapshotClient { inner })
    }
}

/// Asynchronous snapshot client.
#[derive(Clone)]
pub struct SnapshotClient {
    inner: ServiceClient,
}

impl SnapshotClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        SnapshotClientBuilder::new(base_url)?.build()
    }

    /// Wrap an existing shared client.
    #[must_use]
    pub fn from_service_client(inner: ServiceClient) -> Self {
        Self { inner }
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    async fn get_page<R>(&self, path: &str, options: &ListOptions) -> Result<Page<R>>
    where
        R: DeserializeOwned,
    {
        let page = self
            .inner
            .json::<(), Vec<R>>(Method::GET, path, &options.to_pairs(), None)
            .await?
            .into_page()?;
        debug!(path, returned = page.len(), total = ?page.total, "snapshot page");
        Ok(page)
    }

    async fn send_empty<B>(&self, method: Method, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.inner.empty(method, path, &[], Some(body)).await
    }
}

#[async_trait]
impl SnapshotService for SnapshotClient {
    async fn list(&self, options: &ListOptions) -> Result<Page<Snapshot>> {
        let path = ApiResource::Snapshot.base_path();
        self.get_page(&path, options).await
    }

    async fn list_by_vm(
        &self,
        options: &ListOptions,
        vm_identifier: &str,
    ) -> Result<Page<Snapshot>> {
        validate_identifier("vm identifier", vm_identifier)?;
        let path = ApiResource::Vm.path(&format!("snapshot/{vm_identifier}"));
        self.get_page(&path, options).await
    }

    async fn create(&self, name: &str, vm_identifier: &str) -> Result<()> {
        let request = CreateSnapshotRequest {
            name: name.to_string(),
            vm_identifier: vm_identifier.to_string(),
        };
        request.validate()?;
        info!(name, vm = vm_identifier, "creating snapshot");
        let path = ApiResource::Snapshot.path("add");
        self.send_empty(Method::POST, &path, &request).await
    }

    async fn rollback(&self, snapshot_identifier: &str) -> Result<()> {
        require_identifier("snapshot identifier", snapshot_identifier)?;
        info!(snapshot = snapshot_identifier, "rolling back to snapshot");
        let request = RollbackSnapshotRequest {
            snapshot_identifier: snapshot_identifier.to_string(),
        };
        let path = ApiResource::Snapshot.path("rollback");
        self.send_empty(Method::POST, &path, &request).await
    }

    async fn enable_auto(&self, request: &EnableAutoSnapshotRequest) -> Result<()> {
        request.validate()?;
        info!(vm = %request.vm_identifier, period = %request.period, "enabling automatic snapshots");
        let path = ApiResource::Snapshot.path("enable/auto");
        self.send_empty(Method::POST, &path, request).await
    }

    async fn delete(&self, snapshot_identifier: &str, reason: &str, note: &str) -> Result<()> {
        require_identifier("snapshot identifier", snapshot_identifier)?;
        info!(snapshot = snapshot_identifier, "deleting snapshot");
        let body = DeleteSnapshotRequest {
            snapshot_identifier: snapshot_identifier.to_string(),
            delete_statistic: DeleteStatistic::new(reason, note),
        };
        let path = ApiResource::Snapshot.base_path();
        self.send_empty(Method::DELETE, &path, &body).await
    }
}
