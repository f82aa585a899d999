use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::storage::record::{de_loose_opt_string, de_loose_string};
use crate::storage::{Collection, StoredEntity};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct Group {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
struct GroupRecord {
    #[serde(rename = "_id", deserialize_with = "de_loose_string")]
    id: String,
    #[serde(deserialize_with = "de_loose_string")]
    category_id: String,
    #[serde(deserialize_with = "de_loose_string")]
    name: String,
    #[serde(default, deserialize_with = "de_loose_opt_string")]
    description: Option<String>,
}

impl<'de> Deserialize<'de> for Group {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = GroupRecord::deserialize(deserializer)?;
        Ok(Group {
            id: record.id,
            category_id: record.category_id,
            name: record.name,
            description: record.description,
        })
    }
}

impl StoredEntity for Group {
    const COLLECTION: Collection = Collection::Groups;

    fn id(&self) -> &str {
        &self.id
    }
}

// 小组成员关系
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "group.ts")]
pub struct GroupMembership {
    pub id: String,
    pub group_id: String,
    pub student_id: String,
}

#[derive(Deserialize)]
struct GroupMembershipRecord {
    #[serde(rename = "_id", deserialize_with = "de_loose_string")]
    id: String,
    #[serde(deserialize_with = "de_loose_string")]
    group_id: String,
    #[serde(deserialize_with = "de_loose_string")]
    student_id: String,
}

impl<'de> Deserialize<'de> for GroupMembership {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = GroupMembershipRecord::deserialize(deserializer)?;
        Ok(GroupMembership {
            id: record.id,
            group_id: record.group_id,
            student_id: record.student_id,
        })
    }
}

impl StoredEntity for GroupMembership {
    const COLLECTION: Collection = Collection::GroupMembers;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGroup {
    pub category_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGroupMembership {
    pub group_id: String,
    pub student_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
