//! Kubernetes cluster models as exchanged with the VPSie API.

use serde::{Deserialize, Serialize};
use validator::Validate;
use vpsie_core::types::{null_as_default, DeleteStatistic};

/// A cluster as returned by `GET k8s/cluster/byId/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct K8sCluster {
    /// Cluster name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cluster_name: String,
    /// Cluster identifier.
    pub identifier: String,
    /// Total node count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
    /// Nodes belonging to the cluster.
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<ClusterNode>,
    /// Creation timestamp as reported by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
    /// Creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Display nickname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Total vCPUs.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpu: u32,
    /// Total RAM in MiB.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ram: u64,
    /// Traffic allowance.
    #[serde(default, deserialize_with = "null_as_default")]
    pub traffic: u64,
    /// Dashboard color tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Price.
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
}

/// A cluster row as returned by `GET k8s/cluster/all`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct K8sClusterSummary {
    /// Cluster name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cluster_name: String,
    /// Cluster identifier.
    pub identifier: String,
    /// Total node count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
    /// Creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Display nickname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Total vCPUs.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpu: u32,
    /// Total RAM in MiB.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ram: u64,
    /// Traffic allowance.
    #[serde(default, deserialize_with = "null_as_default")]
    pub traffic: u64,
    /// Dashboard color tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Price.
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    /// Number of manager (control plane) nodes.
    #[serde(default, rename = "managerCount", deserialize_with = "null_as_default")]
    pub manager_count: u32,
    /// Number of worker nodes.
    #[serde(default, rename = "slaveCount", deserialize_with = "null_as_default")]
    pub worker_count: u32,
}

/// A node embedded in a [`K8sCluster`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterNode {
    /// Node record id.
    pub id: u64,
    /// Owning user id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: u64,
    /// Node hostname.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hostname: String,
    /// Public IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ip: Option<String>,
    /// Private IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_ip: Option<String>,
    /// Node role as a numeric code.
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_type: u32,
    /// Underlying VM id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_id: u64,
    /// Datacenter id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub datacenter_id: u64,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
}

/// Request payload for `POST k8s/create/cluster`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateK8sRequest {
    /// Name of the new cluster.
    #[validate(length(min = 1))]
    pub cluster_name: String,
    /// Datacenter identifier.
    #[validate(length(min = 1))]
    pub dc_identifier: String,
    /// Number of manager nodes.
    pub nodes_count_master: u32,
    /// Number of worker nodes.
    #[serde(rename = "nodesCountSlave")]
    pub nodes_count_worker: u32,
    /// VPC id.
    pub vpc_id: u64,
    /// Kubernetes version id.
    pub kuber_ver: u32,
    /// Resource (plan) identifier.
    pub resource_identifier: String,
    /// Project identifier.
    pub project_identifier: String,
}

/// Body sent with `DELETE k8s/cluster/byId/{id}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteK8sRequest {
    /// Deletion reason.
    pub delete_statistic: DeleteStatistic,
}

impl DeleteK8sRequest {
    /// Build a delete body from a reason and note.
    #[must_use]
    pub fn new(reason: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            delete_statistic: DeleteStatistic::new(reason, note),
        }
    }
}
