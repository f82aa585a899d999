//! 通用记录存储操作

use super::SeaOrmStorage;
use crate::entity::records::{ActiveModel, Column, Entity as Records};
use crate::errors::{PeerGroupsError, Result};
use crate::storage::record::RECORD_ID_FIELD;
use crate::storage::{Collection, Record};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde_json::Value;

impl SeaOrmStorage {
    /// 读取集合内全部记录（按插入顺序）
    pub async fn read_records_impl(&self, collection: Collection) -> Result<Vec<Record>> {
        let models = Records::find()
            .filter(Column::Collection.eq(collection.as_str()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                PeerGroupsError::database_operation(format!("读取集合 {collection} 失败: {e}"))
            })?;

        models.into_iter().map(|m| m.into_record()).collect()
    }

    /// 插入记录并分配 ID
    pub async fn insert_records_impl(
        &self,
        collection: Collection,
        records: Vec<Record>,
    ) -> Result<Vec<Record>> {
        let now = chrono::Utc::now().timestamp();
        let mut stored = Vec::with_capacity(records.len());

        for mut record in records {
            record.remove(RECORD_ID_FIELD);
            let record_id = uuid::Uuid::new_v4().to_string();

            let model = ActiveModel {
                record_id: Set(record_id.clone()),
                collection: Set(collection.as_str().to_string()),
                data: Set(serde_json::to_string(&record)?),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            model.insert(&self.db).await.map_err(|e| {
                PeerGroupsError::database_operation(format!("写入集合 {collection} 失败: {e}"))
            })?;

            record.insert(RECORD_ID_FIELD.to_string(), Value::String(record_id));
            stored.push(record);
        }

        Ok(stored)
    }

    /// 合并更新部分字段
    pub async fn update_record_impl(
        &self,
        collection: Collection,
        record_id: &str,
        fields: Record,
    ) -> Result<()> {
        let existing = Records::find()
            .filter(Self::record_condition(collection, record_id))
            .one(&self.db)
            .await
            .map_err(|e| PeerGroupsError::database_operation(format!("查询记录失败: {e}")))?
            .ok_or_else(|| {
                PeerGroupsError::not_found(format!("{collection} record {record_id} not found"))
            })?;

        let mut record = existing.clone().into_record()?;
        for (key, value) in fields {
            if key != RECORD_ID_FIELD {
                record.insert(key, value);
            }
        }
        record.remove(RECORD_ID_FIELD);

        let mut model = existing.into_active_model();
        model.data = Set(serde_json::to_string(&record)?);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        model
            .update(&self.db)
            .await
            .map_err(|e| PeerGroupsError::database_operation(format!("更新记录失败: {e}")))?;

        Ok(())
    }

    /// 删除记录
    pub async fn delete_record_impl(&self, collection: Collection, record_id: &str) -> Result<()> {
        let result = Records::delete_many()
            .filter(Self::record_condition(collection, record_id))
            .exec(&self.db)
            .await
            .map_err(|e| PeerGroupsError::database_operation(format!("删除记录失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(PeerGroupsError::not_found(format!(
                "{collection} record {record_id} not found"
            )));
        }
        Ok(())
    }

    fn record_condition(collection: Collection, record_id: &str) -> Condition {
        Condition::all()
            .add(Column::Collection.eq(collection.as_str()))
            .add(Column::RecordId.eq(record_id))
    }
}
