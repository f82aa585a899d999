//! 通用记录实体
//!
//! 所有集合共用一张 `records` 表，业务字段以 JSON 文本保存在 `data` 列。

use sea_orm::entity::prelude::*;
use serde_json::Value;

use crate::errors::PeerGroupsError;
use crate::storage::Record;
use crate::storage::record::RECORD_ID_FIELD;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub record_id: String,
    pub collection: String,
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 解析 JSON 数据并补上记录 ID
    pub fn into_record(self) -> crate::errors::Result<Record> {
        let mut record = match serde_json::from_str::<Value>(&self.data)? {
            Value::Object(map) => map,
            other => {
                return Err(PeerGroupsError::serialization(format!(
                    "record {} in {} is not a JSON object: {other}",
                    self.record_id, self.collection
                )));
            }
        };
        record.insert(RECORD_ID_FIELD.to_string(), Value::String(self.record_id));
        Ok(record)
    }
}
