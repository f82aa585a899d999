use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{PeerGroupsError, Result};
use crate::storage::record::{de_loose_opt_f64, de_loose_opt_string, de_loose_string};
use crate::storage::{Collection, StoredEntity};

/// 未设置或非法容量时使用的每组人数
pub const DEFAULT_CAPACITY: u32 = 5;

// 分组方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "category.ts")]
pub enum AssignmentMode {
    Random, // 系统随机分配
    Choice, // 学生自选
}

impl AssignmentMode {
    pub const RANDOM: &'static str = "random";
    pub const CHOICE: &'static str = "choice";

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentMode::Random => Self::RANDOM,
            AssignmentMode::Choice => Self::CHOICE,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "random" | "aleatorio" => Some(AssignmentMode::Random),
            "choice" | "eleccion" | "elección" => Some(AssignmentMode::Choice),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for AssignmentMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AssignmentMode::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "无效的分组方式: '{s}'. 支持的方式: random, choice"
            ))
        })
    }
}

impl std::fmt::Display for AssignmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssignmentMode {
    type Err = PeerGroupsError;

    fn from_str(s: &str) -> Result<Self> {
        AssignmentMode::parse(s)
            .ok_or_else(|| PeerGroupsError::validation(format!("Invalid assignment mode: {s}")))
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "category.ts")]
pub struct Category {
    pub id: String,
    pub course_id: String,
    pub name: String,
    pub mode: AssignmentMode,
    pub capacity: u32,
    pub description: Option<String>,
}

// 存储层中的分类记录
#[derive(Deserialize)]
struct CategoryRecord {
    #[serde(rename = "_id", deserialize_with = "de_loose_string")]
    id: String,
    #[serde(deserialize_with = "de_loose_string")]
    course_id: String,
    #[serde(deserialize_with = "de_loose_string")]
    name: String,
    #[serde(rename = "type", default, deserialize_with = "de_loose_opt_string")]
    mode: Option<String>,
    #[serde(default, deserialize_with = "de_loose_opt_f64")]
    capacity: Option<f64>,
    #[serde(default, deserialize_with = "de_loose_opt_string")]
    description: Option<String>,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        // 旧数据可能没有类型，按自选处理
        let mode = record
            .mode
            .as_deref()
            .and_then(AssignmentMode::parse)
            .unwrap_or(AssignmentMode::Choice);
        let capacity = record
            .capacity
            .filter(|c| *c >= 1.0)
            .map(|c| c.min(u32::MAX as f64) as u32)
            .unwrap_or(DEFAULT_CAPACITY);

        Self {
            id: record.id,
            course_id: record.course_id,
            name: record.name,
            mode,
            capacity,
            description: record.description,
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        CategoryRecord::deserialize(deserializer).map(Category::from)
    }
}

impl StoredEntity for Category {
    const COLLECTION: Collection = Collection::Categories;

    fn id(&self) -> &str {
        &self.id
    }
}

/// 待写入的分类
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub course_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mode: AssignmentMode,
    pub capacity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 分类的部分更新
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mode: Option<AssignmentMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.mode.is_none()
            && self.capacity.is_none()
            && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::record::{decode, encode};
    use serde_json::json;

    #[test]
    fn test_legacy_mode_and_capacity() {
        let record = json!({
            "_id": "c1",
            "course_id": 7,
            "name": "Proyecto",
            "type": "Aleatorio",
            "capacity": 0
        });
        let category: Category = decode(record.as_object().unwrap()).unwrap();
        assert_eq!(category.course_id, "7");
        assert_eq!(category.mode, AssignmentMode::Random);
        assert_eq!(category.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_missing_mode_reads_as_choice() {
        let record = json!({"_id": "c2", "course_id": "c", "name": "Labs", "capacity": "3"});
        let category: Category = decode(record.as_object().unwrap()).unwrap();
        assert_eq!(category.mode, AssignmentMode::Choice);
        assert_eq!(category.capacity, 3);
    }

    #[test]
    fn test_new_category_uses_stored_field_names() {
        let record = encode(&NewCategory {
            course_id: "c".into(),
            name: "Labs".into(),
            mode: AssignmentMode::Random,
            capacity: 4,
            description: None,
        })
        .unwrap();
        assert_eq!(record["type"], json!("random"));
        assert!(!record.contains_key("description"));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            "eleccion".parse::<AssignmentMode>().unwrap(),
            AssignmentMode::Choice
        );
        assert!("teams".parse::<AssignmentMode>().is_err());
    }
}
