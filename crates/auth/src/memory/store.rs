use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use warden_core::UserId;

use crate::{Record, RecordKind, RecordStore, StorageError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RecordKey {
    kind: RecordKind,
    id: UserId,
}

type Records = Arc<RwLock<HashMap<RecordKey, JsonValue>>>;

/// In-memory record store.
///
/// Cloning shares the underlying records, so a test can keep a clone for
/// inspection while the facade owns another.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    records: Records,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current payload of a record, if it has ever been written.
    pub fn get(&self, kind: RecordKind, id: &UserId) -> Option<JsonValue> {
        let key = RecordKey {
            kind,
            id: id.clone(),
        };
        let records = self.records.read().ok()?;
        records.get(&key).cloned()
    }

    /// Number of written records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create_record(&self, kind: RecordKind, id: &UserId) -> Arc<dyn Record> {
        Arc::new(InMemoryRecord {
            key: RecordKey {
                kind,
                id: id.clone(),
            },
            records: Arc::clone(&self.records),
        })
    }
}

/// Handle returned by [`InMemoryRecordStore::create_record`].
#[derive(Debug)]
pub struct InMemoryRecord {
    key: RecordKey,
    records: Records,
}

#[async_trait]
impl Record for InMemoryRecord {
    fn kind(&self) -> &RecordKind {
        &self.key.kind
    }

    fn id(&self) -> &UserId {
        &self.key.id
    }

    /// Objects are shallow-merged into an existing object payload; any other
    /// value replaces the payload.
    async fn update(&self, data: JsonValue) -> Result<(), StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::Other(anyhow::anyhow!("lock poisoned")))?;

        let slot = records
            .entry(self.key.clone())
            .or_insert_with(|| JsonValue::Object(Default::default()));

        match (slot, data) {
            (JsonValue::Object(existing), JsonValue::Object(incoming)) => {
                existing.extend(incoming);
            }
            (slot, data) => *slot = data,
        }
        Ok(())
    }

    async fn load(&self) -> Result<JsonValue, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::Other(anyhow::anyhow!("lock poisoned")))?;

        records.get(&self.key).cloned().ok_or_else(|| StorageError::NotFound {
            kind: self.key.kind.to_string(),
            id: self.key.id.to_string(),
        })
    }
}
