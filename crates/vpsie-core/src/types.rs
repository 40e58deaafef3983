//! Core VPSie domain types.
//!
//! This module names the API resources this workspace binds, the request
//! fragments they share, and the identifier checks every service runs before
//! issuing a request.

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Version prefix shared by every resource path.
pub const API_PREFIX: &str = "apps/v2";

/// API resources exposed by this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiResource {
    /// Managed Kubernetes clusters
    K8s,
    /// VM snapshots
    Snapshot,
    /// Virtual machines (used for per-VM snapshot listings)
    Vm,
}

impl ApiResource {
    /// Returns the resource name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::K8s => "k8s",
            Self::Snapshot => "snapshot",
            Self::Vm => "vm",
        }
    }

    /// Returns all resources.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::K8s, Self::Snapshot, Self::Vm]
    }

    /// Relative path of the resource root, e.g. `apps/v2/k8s`.
    #[must_use]
    pub fn base_path(&self) -> String {
        format!("{API_PREFIX}/{}", self.name())
    }

    /// Relative path of a sub-resource, e.g. `apps/v2/k8s/cluster/all`.
    ///
    /// An empty suffix yields [`ApiResource::base_path`].
    #[must_use]
    pub fn path(&self, suffix: &str) -> String {
        let suffix = suffix.trim_start_matches('/');
        if suffix.is_empty() {
            self.base_path()
        } else {
            format!("{}/{suffix}", self.base_path())
        }
    }
}

impl FromStr for ApiResource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "k8s" => Ok(Self::K8s),
            "snapshot" => Ok(Self::Snapshot),
            "vm" => Ok(Self::Vm),
            _ => Err(Error::ValidationError(format!("Unknown resource: {s}"))),
        }
    }
}

impl std::fmt::Display for ApiResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Why a resource is being deleted. Sent with every delete request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteStatistic {
    /// Short reason code or phrase.
    pub reason: String,
    /// Free-form note.
    pub note: String,
}

impl DeleteStatistic {
    /// Create a delete statistic from a reason and note.
    #[must_use]
    pub fn new(reason: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            note: note.into(),
        }
    }
}

/// Check that an identifier is present.
///
/// Used for identifiers that only travel in a request body.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] naming `kind` when the identifier is blank.
pub fn require_identifier(kind: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::ValidationError(format!("{kind} must not be empty")));
    }
    Ok(())
}

/// Check that an identifier can be placed in a request path.
///
/// Identifiers end up as path segments. Blank values and dot segments (`.`,
/// `..` or their `%2e` spellings) are rejected, as are values containing `/`,
/// `\`, `?` or `#`.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] naming `kind` when the identifier is unusable.
pub fn validate_identifier(kind: &str, value: &str) -> Result<()> {
    require_identifier(kind, value)?;
    let unescaped = value.to_ascii_lowercase().replace("%2e", ".");
    if unescaped == "." || unescaped == ".." {
        return Err(Error::ValidationError(format!(
            "{kind} cannot be a dot segment: {value}"
        )));
    }
    if value.contains(['/', '\\', '?', '#']) {
        return Err(Error::ValidationError(format!(
            "{kind} contains reserved characters: {value}"
        )));
    }
    Ok(())
}

/// Deserialize an explicit `null` as the type's default.
///
/// Pair with `#[serde(default)]` so a missing key behaves the same way.
///
/// # Errors
///
/// Propagates the deserializer error when the value is neither `null` nor a `T`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let option = Option::<T>::deserialize(deserializer)?;
    Ok(option.unwrap_or_default())
}
