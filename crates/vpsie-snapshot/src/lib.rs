//! VM snapshot client and data models for the VPSie API.
//!
//! Covers listing snapshots (account-wide or per VM), taking and deleting
//! snapshots, rolling a VM back, and enabling scheduled snapshots.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{SnapshotClient, SnapshotClientBuilder, SnapshotService};
pub use models::{
    CreateSnapshotRequest, DeleteSnapshotRequest, EnableAutoSnapshotRequest,
    RollbackSnapshotRequest, Snapshot,
};

/// Convenient result alias that reuses the shared VPSie error type.
pub type Result<T> = vpsie_core::Result<T>;
