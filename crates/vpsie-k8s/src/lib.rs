//! Kubernetes cluster client and data models for the VPSie API.
//!
//! Provides typed structures and an asynchronous client for listing, creating,
//! deleting and scaling managed Kubernetes clusters.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{K8sClient, K8sClientBuilder, K8sService};
pub use models::{ClusterNode, CreateK8sRequest, DeleteK8sRequest, K8sCluster, K8sClusterSummary};

/// Convenient result alias that reuses the shared VPSie error type.
pub type Result<T> = vpsie_core::Result<T>;
