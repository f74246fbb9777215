use std::{fmt, time::Duration};

use serde::Deserialize;

use crate::{endpoint, model::error::StorageError};

/// Connection settings for one storage zone. Validated on construction and
/// read-only afterwards.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    storage_zone: String,
    region: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(
        api_key: impl Into<String>,
        storage_zone: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let storage_zone = storage_zone.into();
        let region = region.into();
        let base_url = endpoint::resolve(&storage_zone, &region)?;

        Ok(Self {
            api_key: api_key.into(),
            storage_zone,
            region,
            base_url,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        self.base_url = base_url;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn storage_zone(&self) -> &str {
        &self.storage_zone
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("storage_zone", &self.storage_zone)
            .field("region", &self.region)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageEntry {
    pub kind: EntryKind,
    pub name: String,
}

impl StorageEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// One record of a listing body. Both fields are required, anything else the
/// service sends (`Guid`, `Length`, `LastChanged`, ...) is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListedObject {
    pub object_name: String,
    pub is_directory: bool,
}

impl From<ListedObject> for StorageEntry {
    fn from(obj: ListedObject) -> Self {
        let kind = if obj.is_directory {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        StorageEntry {
            kind,
            name: obj.object_name,
        }
    }
}

/// Outcome of a storage operation. Failures are reported as values, never
/// as an `Err`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationResult<T> {
    Success {
        status: u16,
        message: String,
        data: T,
    },
    Error {
        status: u16,
        message: String,
    },
}

impl<T> OperationResult<T> {
    pub fn status(&self) -> u16 {
        match self {
            OperationResult::Success { status, .. } | OperationResult::Error { status, .. } => {
                *status
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            OperationResult::Success { message, .. } | OperationResult::Error { message, .. } => {
                message
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            OperationResult::Success { data, .. } => Some(data),
            OperationResult::Error { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            OperationResult::Success { data, .. } => Some(data),
            OperationResult::Error { .. } => None,
        }
    }
}

impl<T> From<StorageError> for OperationResult<T> {
    fn from(err: StorageError) -> Self {
        OperationResult::Error {
            status: err.status(),
            message: err.to_string(),
        }
    }
}
