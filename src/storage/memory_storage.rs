//! 内存记录存储
//!
//! 用于开发环境、测试以及 SeaORM 后端不可用时的回退。集合内保持插入顺序。

use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use super::record::{RECORD_ID_FIELD, record_id};
use super::{Collection, Record, RecordStore};
use crate::errors::{PeerGroupsError, Result};

#[derive(Default)]
pub struct MemoryStorage {
    collections: DashMap<Collection, Vec<Record>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前集合中的记录数
    pub fn count(&self, collection: Collection) -> usize {
        self.collections
            .get(&collection)
            .map(|records| records.len())
            .unwrap_or(0)
    }

    fn not_found(collection: Collection, id: &str) -> PeerGroupsError {
        PeerGroupsError::not_found(format!("{collection} record {id} not found"))
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStorage {
    async fn read(&self, collection: Collection) -> Result<Vec<Record>> {
        Ok(self
            .collections
            .get(&collection)
            .map(|records| records.clone())
            .unwrap_or_default())
    }

    async fn insert(&self, collection: Collection, records: Vec<Record>) -> Result<Vec<Record>> {
        let stored: Vec<Record> = records
            .into_iter()
            .map(|mut record| {
                record.insert(
                    RECORD_ID_FIELD.to_string(),
                    Value::String(uuid::Uuid::new_v4().to_string()),
                );
                record
            })
            .collect();

        self.collections
            .entry(collection)
            .or_default()
            .extend(stored.iter().cloned());

        debug!("Inserted {} record(s) into {}", stored.len(), collection);
        Ok(stored)
    }

    async fn update(&self, collection: Collection, id: &str, fields: Record) -> Result<()> {
        let mut records = self.collections.entry(collection).or_default();
        let record = records
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| Self::not_found(collection, id))?;

        for (key, value) in fields {
            if key != RECORD_ID_FIELD {
                record.insert(key, value);
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let mut records = self.collections.entry(collection).or_default();
        let position = records
            .iter()
            .position(|r| record_id(r) == Some(id))
            .ok_or_else(|| Self::not_found(collection, id))?;
        records.remove(position);
        Ok(())
    }
}
