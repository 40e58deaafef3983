//! Asynchronous Kubernetes cluster client implementation.

use crate::models::{CreateK8sRequest, DeleteK8sRequest, K8sCluster, K8sClusterSummary};
use crate::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::info;
use url::Url;
use validator::Validate;
use vpsie_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder, K8S_DEFAULT_TIMEOUT};
use vpsie_core::types::{validate_identifier, ApiResource};
use vpsie_core::{Envelope, ListOptions};

const USER_AGENT: &str = concat!("vpsie-k8s/", env!("CARGO_PKG_VERSION"));

/// Operations on managed Kubernetes clusters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait K8sService: Send + Sync {
    /// List clusters owned by the account.
    ///
    /// `offset` and `limit` are sent only when set; default options issue the
    /// bare `GET k8s/cluster/all`.
    async fn list(&self, options: &ListOptions) -> Result<Vec<K8sClusterSummary>>;

    /// Fetch a single cluster, including its nodes.
    async fn get(&self, identifier: &str) -> Result<K8sCluster>;

    /// Request a new cluster.
    async fn create(&self, request: &CreateK8sRequest) -> Result<()>;

    /// Delete a cluster, recording why.
    async fn delete(&self, identifier: &str, reason: &str, note: &str) -> Result<()>;

    /// Add one worker node to a cluster.
    async fn add_worker(&self, identifier: &str) -> Result<()>;

    /// Remove one worker node from a cluster.
    async fn remove_worker(&self, identifier: &str) -> Result<()>;
}

/// Builder for [`K8sClient`].
#[derive(Debug, Clone)]
pub struct K8sClientBuilder {
    inner: ServiceClientBuilder,
}

impl K8sClientBuilder {
    /// Create a builder for the specified base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder =
            ServiceClientBuilder::new(base_url, Duration::from_secs(K8S_DEFAULT_TIMEOUT))?
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
    pub fn build(self) -> Result<K8sClient> {
        let inner = self.inner.build()?;
        Ok(K8sClient { inner })
    }
}

/// Asynchronous Kubernetes cluster client.
#[derive(Clone)]
pub struct K8sClient {
    inner: ServiceClient,
}

impl K8sClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        K8sClientBuilder::new(base_url)?.build()
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

    async fn get_json<R>(&self, path: &str, params: &[(&'static str, String)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let envelope: Envelope<R> = self
            .inner
            .json::<(), R>(Method::GET, path, params, None)
            .await?;
        envelope.into_data()
    }

    async fn send_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.inner.empty(method, path, &[], body).await
    }
}

fn cluster_path(identifier: &str, suffix: &str) -> Result<String> {
    validate_identifier("cluster identifier", identifier)?;
    Ok(ApiResource::K8s.path(&format!("cluster/byId/{identifier}{suffix}")))
}

#[async_trait]
impl K8sService for K8sClient {
    async fn list(&self, options: &ListOptions) -> Result<Vec<K8sClusterSummary>> {
        let path = ApiResource::K8s.path("cluster/all");
        self.get_json(&path, &options.to_pairs()).await
    }

    async fn get(&self, identifier: &str) -> Result<K8sCluster> {
        let path = cluster_path(identifier, "")?;
        self.get_json(&path, &[]).await
    }

    async fn create(&self, request: &CreateK8sRequest) -> Result<()> {
        request.validate()?;
        info!(cluster = %request.cluster_name, dc = %request.dc_identifier, "creating Kubernetes cluster");
        let path = ApiResource::K8s.path("create/cluster");
        self.send_empty(Method::POST, &path, Some(request)).await
    }

    async fn delete(&self, identifier: &str, reason: &str, note: &str) -> Result<()> {
        let path = cluster_path(identifier, "")?;
        info!(identifier, "deleting Kubernetes cluster");
        let body = DeleteK8sRequest::new(reason, note);
        self.send_empty(Method::DELETE, &path, Some(&body)).await
    }

    async fn add_worker(&self, identifier: &str) -> Result<()> {
        let path = cluster_path(identifier, "/add/slave")?;
        self.send_empty::<()>(Method::POST, &path, None).await
    }

    async fn remove_worker(&self, identifier: &str) -> Result<()> {
        let path = cluster_path(identifier, "/reduce")?;
        self.send_empty::<()>(Method::DELETE, &path, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use vpsie_core::client::AUTH_HEADER;
    use vpsie_core::Error;
    use wiremock::matchers::{
        any, body_json, header, method, path, query_param, query_param_is_missing,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> K8sClient {
        K8sClientBuilder::new(server.uri())
            .unwrap()
            .with_token("k8s-token")
            .build()
            .unwrap()
    }

    fn cluster_json(identifier: &str) -> serde_json::Value {
        json!({
            "cluster_name": "demo",
            "identifier": identifier,
            "count": 2,
            "nodes": [
                {
                    "id": 11,
                    "user_id": 7,
                    "hostname": "demo-master-1",
                    "default_ip": "203.0.113.10",
                    "private_ip": "10.0.0.10",
                    "node_type": 1,
                    "node_id": 501,
                    "datacenter_id": 3,
                    "created_on": "2023-05-01 10:00:00"
                },
                {
                    "id": 12,
                    "user_id": 7,
                    "hostname": "demo-worker-1",
                    "default_ip": "203.0.113.11",
                    "private_ip": "10.0.0.11",
                    "node_type": 2,
                    "node_id": 502,
                    "datacenter_id": 3,
                    "created_on": "2023-05-01 10:00:00"
                }
            ],
            "created_on": "2023-05-01 10:00:00",
            "updated_on": "2023-05-02 10:00:00",
            "created_by": "ops@example.com",
            "nickname": "demo",
            "cpu": 4,
            "ram": 8192,
            "traffic": 2000,
            "color": "blue",
            "price": 40.0
        })
    }

    #[tokio::test]
    async fn list_clusters_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apps/v2/k8s/cluster/all"))
            .and(header(AUTH_HEADER, "k8s-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": false,
                "data": [{
                    "cluster_name": "demo",
                    "identifier": "c-1",
                    "count": 3,
                    "cpu": 6,
                    "ram": 12288,
                    "traffic": 3000,
                    "price": 60.0,
                    "managerCount": 1,
                    "slaveCount": 2
                }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let clusters = client.list(&ListOptions::default()).await.unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].identifier, "c-1");
        assert_eq!(clusters[0].worker_count, 2);
    }

    #[tokio::test]
    async fn list_clusters_forwards_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apps/v2/k8s/cluster/all"))
            .and(query_param("offset", "10"))
            .and(query_param("limit", "5"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": false, "data": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let clusters = client.list(&ListOptions::new(10, 5)).await.unwrap();
        assert!(clusters.is_empty());
    }

    #[tokio::test]
    async fn list_clusters_default_options_send_no_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apps/v2/k8s/cluster/all"))
            .and(query_param_is_missing("offset"))
            .and(query_param_is_missing("limit"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": false, "data": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.list(&ListOptions::default()).await.unwrap();
    }

    #[tokio::test]
    async fn get_cluster_returns_nodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apps/v2/k8s/cluster/byId/c-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": false,
                "data": cluster_json("c-42")
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let cluster = client.get("c-42").await.unwrap();
        assert_eq!(cluster.identifier, "c-42");
        assert_eq!(cluster.nodes.len(), 2);
        assert_eq!(cluster.nodes[1].hostname, "demo-worker-1");
        assert_eq!(cluster.nodes[0].private_ip.as_deref(), Some("10.0.0.10"));
    }

    #[tokio::test]
    async fn get_cluster_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apps/v2/k8s/cluster/byId/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": true,
                "message": "Cluster not found"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.get("missing").await.unwrap_err();
        assert_eq!(err, Error::NotFound("Cluster not found".to_string()));
    }

    #[tokio::test]
    async fn get_cluster_rejects_blank_identifier_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.get("  ").await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[tokio::test]
    async fn dot_segment_identifiers_never_reach_the_server() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": false})))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        for identifier in ["..", ".", "%2e%2E"] {
            let err = client.delete(identifier, "cost", "").await.unwrap_err();
            assert!(matches!(err, Error::ValidationError(_)), "{identifier}");
            let err = client.add_worker(identifier).await.unwrap_err();
            assert!(matches!(err, Error::ValidationError(_)), "{identifier}");
            let err = client.remove_worker(identifier).await.unwrap_err();
            assert!(matches!(err, Error::ValidationError(_)), "{identifier}");
        }
    }

    #[tokio::test]
    async fn create_cluster_posts_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apps/v2/k8s/create/cluster"))
            .and(body_json(json!({
                "clusterName": "prod",
                "dcIdentifier": "dc-1",
                "nodesCountMaster": 1,
                "nodesCountSlave": 2,
                "vpcId": 9,
                "kuberVer": 3,
                "resourceIdentifier": "res-1",
                "projectIdentifier": "proj-1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": false})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let request = CreateK8sRequest {
            cluster_name: "prod".into(),
            dc_identifier: "dc-1".into(),
            nodes_count_master: 1,
            nodes_count_worker: 2,
            vpc_id: 9,
            kuber_ver: 3,
            resource_identifier: "res-1".into(),
            project_identifier: "proj-1".into(),
        };
        client.create(&request).await.unwrap();
    }

    #[tokio::test]
    async fn create_cluster_validates_request() {
        let server = MockServer::start().await;
        let client = test_client(&server);
        let err = client
            .create(&CreateK8sRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[tokio::test]
    async fn delete_cluster_sends_delete_statistic() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/apps/v2/k8s/cluster/byId/c-7"))
            .and(body_json(json!({
                "deleteStatistic": {"reason": "cost", "note": "consolidating"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": false})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.delete("c-7", "cost", "consolidating").await.unwrap();
    }

    #[tokio::test]
    async fn add_worker_posts_to_add_slave() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apps/v2/k8s/cluster/byId/c-7/add/slave"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": false})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.add_worker("c-7").await.unwrap();
    }

    #[tokio::test]
    async fn remove_worker_deletes_reduce() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/apps/v2/k8s/cluster/byId/c-7/reduce"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.remove_worker("c-7").await.unwrap();
    }

    #[tokio::test]
    async fn remove_worker_propagates_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/apps/v2/k8s/cluster/byId/c-7/reduce"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": true,
                "message": "Cluster has no worker nodes to remove"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.remove_worker("c-7").await.unwrap_err();
        assert_eq!(
            err,
            Error::ApiError("Cluster has no worker nodes to remove".to_string())
        );
    }

    #[tokio::test]
    async fn service_trait_can_be_mocked() {
        let mut mock = MockK8sService::new();
        mock.expect_add_worker()
            .with(mockall::predicate::eq("c-1"))
            .times(1)
            .returning(|_| Ok(()));

        let service: Arc<dyn K8sService> = Arc::new(mock);
        service.add_worker("c-1").await.unwrap();
    }
}
