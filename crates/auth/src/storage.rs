//! Record storage contract.
//!
//! A [`RecordStore`] hands out [`Record`] handles keyed by `(kind, id)`.
//! Creating a handle performs no I/O; reads and writes go through the handle.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use warden_core::UserId;

use crate::StorageError;

/// Category of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    User,
    Role,
    Other(String),
}

impl RecordKind {
    pub fn as_str(&self) -> &str {
        match self {
            RecordKind::User => "user",
            RecordKind::Role => "role",
            RecordKind::Other(kind) => kind,
        }
    }
}

impl core::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RecordKind {
    fn from(value: &str) -> Self {
        match value {
            "user" => RecordKind::User,
            "role" => RecordKind::Role,
            other => RecordKind::Other(other.to_string()),
        }
    }
}

/// Handle to a single keyed record.
#[async_trait]
pub trait Record: Send + Sync + core::fmt::Debug {
    fn kind(&self) -> &RecordKind;

    fn id(&self) -> &UserId;

    /// Write `data` into the record.
    async fn update(&self, data: JsonValue) -> Result<(), StorageError>;

    /// Read the record's current payload.
    async fn load(&self) -> Result<JsonValue, StorageError>;
}

/// Factory for record handles.
pub trait RecordStore: Send + Sync {
    fn create_record(&self, kind: RecordKind, id: &UserId) -> Arc<dyn Record>;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn create_record(&self, kind: RecordKind, id: &UserId) -> Arc<dyn Record> {
        (**self).create_record(kind, id)
    }
}
