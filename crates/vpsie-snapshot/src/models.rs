//! Snapshot models as exchanged with the VPSie API.

use serde::{Deserialize, Serialize};
use validator::Validate;
use vpsie_core::types::{null_as_default, DeleteStatistic};

/// A VM snapshot as returned by the snapshot list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    /// Hostname of the VM the snapshot was taken from.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hostname: String,
    /// Snapshot name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Snapshot identifier.
    pub identifier: String,
    /// Storage key of the backing archive.
    #[serde(default, rename = "backupKey", skip_serializing_if = "Option::is_none")]
    pub backup_key: Option<String>,
    /// Snapshot state.
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    /// Datacenter identifier.
    #[serde(default, rename = "dcIdentifier", deserialize_with = "null_as_default")]
    pub dc_identifier: String,
    /// Non-zero when created by the daily schedule.
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily: u32,
    /// Non-zero for manual snapshots.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_snapshot: u32,
    /// Identifier of the source VM.
    #[serde(default, rename = "vmIdentifier", deserialize_with = "null_as_default")]
    pub vm_identifier: String,
    /// SHA-1 of the backing archive.
    #[serde(default, rename = "backupsha1", skip_serializing_if = "Option::is_none")]
    pub backup_sha1: Option<String>,
    /// Operating system identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_identifier: Option<String>,
    /// Owning user id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: u64,
}

/// Request payload for `POST snapshot/add`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnapshotRequest {
    /// Snapshot name.
    #[validate(length(min = 1))]
    pub name: String,
    /// VM to snapshot.
    #[validate(length(min = 1))]
    pub vm_identifier: String,
}

/// Request payload for `POST snapshot/rollback`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RollbackSnapshotRequest {
    /// Snapshot to restore.
    pub snapshot_identifier: String,
}

/// Body sent with `DELETE snapshot`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSnapshotRequest {
    /// Snapshot to delete.
    pub snapshot_identifier: String,
    /// Deletion reason.
    pub delete_statistic: DeleteStatistic,
}

/// Request payload for `POST snapshot/enable/auto`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnableAutoSnapshotRequest {
    /// VM identifier.
    #[validate(length(min = 1))]
    pub vm_identifier: String,
    /// Numeric VM id.
    pub vm_id: u64,
    /// Schedule period.
    #[validate(length(min = 1))]
    pub period: String,
    /// Daily snapshots to keep.
    pub daily_snapshot: u32,
    /// Weekly snapshots to keep.
    pub weekly_snapshot: u32,
    /// Monthly snapshots to keep.
    pub monthly_snapshot: u32,
    /// Tags applied to generated snapshots.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}
