//! The response wrapper shared by every VPSie endpoint.
//!
//! Successful responses look like `{"error": false, "data": ...}`; list endpoints
//! may add a `total`, and failures reported in-band carry a `message`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Generic `{error, data}` response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    /// Set by the API when the request was rejected.
    #[serde(default)]
    pub error: bool,
    /// Response payload.
    pub data: T,
    /// Total number of records for paginated lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Server-provided message, usually only present on errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, surfacing an in-band error flag as [`Error::ApiError`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApiError`] when `error` is set.
    pub fn into_data(self) -> Result<T> {
        if self.error {
            return Err(api_error(self.message));
        }
        Ok(self.data)
    }
}

impl<T> Envelope<Vec<T>> {
    /// Unwrap a list payload together with its total count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApiError`] when `error` is set.
    pub fn into_page(self) -> Result<Page<T>> {
        let total = self.total;
        let items = self.into_data()?;
        Ok(Page { items, total })
    }
}

/// One page of a paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records in this page.
    pub items: Vec<T>,
    /// Total number of records across all pages, when reported.
    pub total: Option<u64>,
}

impl<T> Page<T> {
    /// Number of records in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the page holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Body returned by operations that carry no data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Status {
    /// Set by the API when the request was rejected.
    #[serde(default)]
    pub error: bool,
    /// Server-provided message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Status {
    /// Convert the status into a result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApiError`] when `error` is set.
    pub fn into_result(self) -> Result<()> {
        if self.error {
            return Err(api_error(self.message));
        }
        Ok(())
    }
}

fn api_error(message: Option<String>) -> Error {
    Error::ApiError(message.unwrap_or_else(|| "request rejected by the API".to_string()))
}
