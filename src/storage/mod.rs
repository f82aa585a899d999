//! 记录存储层
//!
//! 引擎只依赖一个按集合划分的通用 CRUD 接口，不拥有持久化本身。

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::errors::{PeerGroupsError, Result};

pub mod memory_storage;
pub mod record;
pub mod sea_orm_storage;

pub use record::{Record, StoredEntity};

/// 记录集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Categories,
    Groups,
    GroupMembers,
    Activities,
    Grades,
    Enrollments,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Categories,
        Collection::Groups,
        Collection::GroupMembers,
        Collection::Activities,
        Collection::Grades,
        Collection::Enrollments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Groups => "groups",
            Collection::GroupMembers => "group_members",
            Collection::Activities => "activities",
            Collection::Grades => "grades",
            Collection::Enrollments => "enrollments",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Collection {
    type Err = PeerGroupsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PeerGroupsError::validation(format!("Unknown collection: {s}")))
    }
}

/// 通用记录存储接口
///
/// 没有事务，也没有锁；读取顺序不作保证。
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    // 读取整个集合
    async fn read(&self, collection: Collection) -> Result<Vec<Record>>;
    // 插入记录，返回带有存储层分配 `_id` 的记录
    async fn insert(&self, collection: Collection, records: Vec<Record>) -> Result<Vec<Record>>;
    // 按 ID 合并更新部分字段
    async fn update(&self, collection: Collection, record_id: &str, fields: Record) -> Result<()>;
    // 按 ID 删除
    async fn delete(&self, collection: Collection, record_id: &str) -> Result<()>;
}

/// 读取并解码整个集合（跳过坏记录）
pub async fn load_all<T: StoredEntity>(store: &dyn RecordStore) -> Result<Vec<T>> {
    let records = store.read(T::COLLECTION).await?;
    Ok(record::decode_all(&records))
}

/// 按 ID 查找单个实体
pub async fn find_by_id<T: StoredEntity>(store: &dyn RecordStore, id: &str) -> Result<Option<T>> {
    let records = store.read(T::COLLECTION).await?;
    records
        .iter()
        .find(|r| record::record_id(r) == Some(id))
        .map(record::decode::<T>)
        .transpose()
}

/// 插入单个实体并返回解码后的结果
pub async fn insert_one<T: StoredEntity, N: Serialize + Sync>(
    store: &dyn RecordStore,
    new: &N,
) -> Result<T> {
    let inserted = store
        .insert(T::COLLECTION, vec![record::encode(new)?])
        .await?;
    let stored = inserted.first().ok_or_else(|| {
        PeerGroupsError::store_operation(format!("insert into {} returned nothing", T::COLLECTION))
    })?;
    record::decode(stored)
}

/// 部分字段更新
pub async fn update_fields<P: Serialize + Sync>(
    store: &dyn RecordStore,
    collection: Collection,
    id: &str,
    patch: &P,
) -> Result<()> {
    store.update(collection, id, record::encode(patch)?).await
}

/// 根据配置创建存储后端
pub async fn create_storage(backend: &str) -> Result<Arc<dyn RecordStore>> {
    match backend {
        "sea_orm" => {
            let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
            Ok(Arc::new(storage))
        }
        "memory" => Ok(Arc::new(memory_storage::MemoryStorage::new())),
        other => Err(PeerGroupsError::store_plugin_not_found(format!(
            "Unknown record store backend: {other}"
        ))),
    }
}
