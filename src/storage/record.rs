//! 记录边界：松散类型的 JSON 记录与显式实体之间的转换

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::Collection;
use crate::errors::{PeerGroupsError, Result};

/// 存储层中的一条记录
pub type Record = serde_json::Map<String, Value>;

/// 存储层分配的记录 ID 字段
pub const RECORD_ID_FIELD: &str = "_id";

/// 可从某个集合解码的实体
pub trait StoredEntity: DeserializeOwned {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    /// 解码后的校验与归一化
    fn validate(self) -> Result<Self> {
        Ok(self)
    }
}

/// 读取记录 ID
pub fn record_id(record: &Record) -> Option<&str> {
    record.get(RECORD_ID_FIELD).and_then(Value::as_str)
}

/// 将一条记录解码为实体
pub fn decode<T: StoredEntity>(record: &Record) -> Result<T> {
    let entity: T = serde_json::from_value(Value::Object(record.clone())).map_err(|e| {
        PeerGroupsError::validation(format!(
            "invalid {} record {}: {e}",
            T::COLLECTION,
            record_id(record).unwrap_or("<no id>")
        ))
    })?;
    entity.validate()
}

/// 批量解码，跳过无法解码的记录
pub fn decode_all<T: StoredEntity>(records: &[Record]) -> Vec<T> {
    records
        .iter()
        .filter_map(|record| match decode::<T>(record) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!("Skipping malformed record: {}", e);
                None
            }
        })
        .collect()
}

/// 将待写入的结构体编码为记录
pub fn encode<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(PeerGroupsError::serialization(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

fn loose_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 字符串字段：接受字符串或数字，去除首尾空白
pub fn de_loose_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    loose_to_string(value.clone())
        .ok_or_else(|| serde::de::Error::custom(format!("expected a string, got {value}")))
}

/// 可选字符串字段：null 与空字符串视为缺失
pub fn de_loose_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(loose_to_string)
        .filter(|s| !s.is_empty()))
}

/// 数值字段：接受数字或数字字符串
pub fn de_loose_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("number out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid number '{s}': {e}"))),
        other => Err(serde::de::Error::custom(format!(
            "expected a number, got {other}"
        ))),
    }
}

/// 可选数值字段：缺失、null 或无法解析都视为缺失
pub fn de_loose_opt_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite()))
}
